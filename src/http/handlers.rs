//! Route handlers.

use std::time::Instant;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::http::request::{max_tax_year, CalculateTaxParams, FieldError};
use crate::http::response::{ApiError, TaxResponse};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::resilience::with_timeout;
use crate::tax::{calculate, effective_rate};

/// `GET /api/v1/calculate-tax?income=<number>&year=<integer>`
///
/// Bounded by the configured request deadline.
pub async fn calculate_tax(
    State(state): State<AppState>,
    params: Result<Query<CalculateTaxParams>, QueryRejection>,
) -> Response {
    let start = Instant::now();

    let response = match with_timeout(state.request_timeout, handle_calculation(&state, params)).await {
        Ok(Ok(body)) => (StatusCode::OK, Json(body)).into_response(),
        Ok(Err(e)) => e.into_response(),
        Err(elapsed) => ApiError::DeadlineExceeded(elapsed).into_response(),
    };

    metrics::record_request(response.status().as_u16(), start);
    response
}

async fn handle_calculation(
    state: &AppState,
    params: Result<Query<CalculateTaxParams>, QueryRejection>,
) -> Result<TaxResponse, ApiError> {
    let Query(params) = params
        .map_err(|rejection| ApiError::Validation(vec![FieldError::malformed_query(rejection.body_text())]))?;
    let query = params.validate(max_tax_year()).map_err(ApiError::Validation)?;

    tracing::info!(
        income = %query.income,
        year = query.year,
        "Received tax calculation request"
    );

    let brackets = state.fetcher.fetch(query.year).await?;
    let result = calculate(query.income, &brackets);
    let effective = effective_rate(result.total_tax, query.income)
        .ok_or_else(|| ApiError::Internal(format!("effective rate undefined for income {}", query.income)))?;

    tracing::info!(
        total_tax = %result.total_tax,
        effective_rate = %effective,
        brackets_applied = result.breakdown.len(),
        "Calculated tax"
    );

    Ok(TaxResponse {
        income: query.income,
        year: query.year,
        total_tax: result.total_tax,
        effective_tax_rate: effective,
        breakdown: result.breakdown,
    })
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Any unmatched route.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
