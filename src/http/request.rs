//! Request handling and validation.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) when the client sent none
//! - Parse and range-check the calculation query parameters
//! - Report every invalid field at once
//!
//! # Design Decisions
//! - Parameters are extracted as raw strings so that bad input produces the
//!   API's own validation body instead of a framework rejection
//! - Validation happens before any upstream call

use std::str::FromStr;

use axum::http::{HeaderValue, Request};
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID in both directions.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Earliest tax year accepted.
pub const MIN_TAX_YEAR: i32 = 2000;

/// Request ID generator for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Latest tax year accepted: next calendar year (UTC).
pub fn max_tax_year() -> i32 {
    chrono::Utc::now().year() + 1
}

/// Raw query string of `GET /api/v1/calculate-tax`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalculateTaxParams {
    pub income: Option<String>,
    pub year: Option<String>,
}

/// Validated calculation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxQuery {
    pub income: Decimal,
    pub year: i32,
}

/// One entry of the `details` array in a validation error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub loc: Vec<&'static str>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
}

impl FieldError {
    fn query(field: &'static str, kind: &'static str, msg: impl Into<String>, input: Option<&str>) -> Self {
        Self {
            loc: vec!["query", field],
            msg: msg.into(),
            kind,
            input: input.map(str::to_string),
        }
    }

    /// Error for a query string that could not be decoded at all.
    pub fn malformed_query(msg: impl Into<String>) -> Self {
        Self {
            loc: vec!["query"],
            msg: msg.into(),
            kind: "query_parsing",
            input: None,
        }
    }
}

impl CalculateTaxParams {
    /// Check both parameters; `max_year` is normally [`max_tax_year`].
    pub fn validate(&self, max_year: i32) -> Result<TaxQuery, Vec<FieldError>> {
        let mut errors = Vec::new();

        let income = match self.income.as_deref() {
            None => {
                errors.push(FieldError::query("income", "missing", "Field required", None));
                None
            }
            Some(raw) => match parse_income(raw) {
                None => {
                    errors.push(FieldError::query(
                        "income",
                        "number_parsing",
                        "Input should be a valid number",
                        Some(raw),
                    ));
                    None
                }
                Some(income) if income <= Decimal::ZERO => {
                    errors.push(FieldError::query(
                        "income",
                        "greater_than",
                        "Input should be greater than 0",
                        Some(raw),
                    ));
                    None
                }
                Some(income) => Some(income),
            },
        };

        let year = match self.year.as_deref() {
            None => {
                errors.push(FieldError::query("year", "missing", "Field required", None));
                None
            }
            Some(raw) => match raw.trim().parse::<i32>() {
                Err(_) => {
                    errors.push(FieldError::query(
                        "year",
                        "int_parsing",
                        "Input should be a valid integer",
                        Some(raw),
                    ));
                    None
                }
                Ok(year) if year < MIN_TAX_YEAR => {
                    errors.push(FieldError::query(
                        "year",
                        "greater_than_equal",
                        format!("Input should be greater than or equal to {MIN_TAX_YEAR}"),
                        Some(raw),
                    ));
                    None
                }
                Ok(year) if year > max_year => {
                    errors.push(FieldError::query(
                        "year",
                        "less_than_equal",
                        format!("Input should be less than or equal to {max_year}"),
                        Some(raw),
                    ));
                    None
                }
                Ok(year) => Some(year),
            },
        };

        match (income, year) {
            (Some(income), Some(year)) if errors.is_empty() => Ok(TaxQuery { income, year }),
            _ => Err(errors),
        }
    }
}

fn parse_income(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}
