//! Response bodies and error mapping.
//!
//! # Responsibilities
//! - Define the success body of the calculation endpoint
//! - Map every failure to a stable JSON error body and status code
//! - Log error detail server-side, never in the response
//!
//! # Design Decisions
//! - Upstream and internal failures share generic messages so no provider
//!   URL, status or stack detail reaches the caller
//! - Validation failures echo field-level details, which are caller input
//! - Malformed provider data is an internal error, not an outage
//! - The request deadline only ever waits on the provider, so expiry reports
//!   the upstream message

use std::any::Any;
use std::error::Error as _;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::fetcher::FetchError;
use crate::http::request::FieldError;
use crate::resilience::TimedOut;
use crate::tax::TaxBreakdownEntry;

pub const VALIDATION_MESSAGE: &str = "Validation failed.";
pub const UPSTREAM_MESSAGE: &str = "Could not fetch tax data";
pub const INTERNAL_MESSAGE: &str = "Internal server error.";
pub const NOT_FOUND_MESSAGE: &str = "Not Found";

/// Success body of `GET /api/v1/calculate-tax`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxResponse {
    pub income: Decimal,
    pub year: i32,
    pub total_tax: Decimal,
    pub effective_tax_rate: Decimal,
    pub breakdown: Vec<TaxBreakdownEntry>,
}

/// Every way a request can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request validation failed")]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Upstream(FetchError),

    #[error("request deadline exceeded")]
    DeadlineExceeded(#[source] TimedOut),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("route not found")]
    NotFound,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a [FieldError]>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Upstream(_) | ApiError::DeadlineExceeded(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        if matches!(err, FetchError::MalformedPayload { .. }) {
            ApiError::Internal(format!("{err}: {}", error_chain(&err)))
        } else {
            ApiError::Upstream(err)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::Validation(details) => {
                tracing::warn!(?details, "Request validation failed");
                ErrorBody {
                    error: VALIDATION_MESSAGE,
                    details: Some(details.as_slice()),
                }
            }
            ApiError::Upstream(err) => {
                tracing::error!(error = %err, cause = %error_chain(err), "Could not fetch tax brackets");
                ErrorBody {
                    error: UPSTREAM_MESSAGE,
                    details: None,
                }
            }
            ApiError::DeadlineExceeded(elapsed) => {
                tracing::error!(error = %elapsed, "Request deadline exceeded while fetching tax brackets");
                ErrorBody {
                    error: UPSTREAM_MESSAGE,
                    details: None,
                }
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "Unhandled error");
                ErrorBody {
                    error: INTERNAL_MESSAGE,
                    details: None,
                }
            }
            ApiError::NotFound => ErrorBody {
                error: NOT_FOUND_MESSAGE,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Sources of `err`, outermost first, joined with `: `.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut parts = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}

/// Response for a handler panic, used by `CatchPanicLayer`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::TransportError;
    use axum::body::to_bytes;
    use rust_decimal_macros::dec;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_upstream_error_hides_detail() {
        let err = ApiError::from(FetchError::UpstreamUnavailable {
            attempts: 3,
            source: TransportError::Request("connect to 10.0.0.7:443 refused".into()),
        });
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Could not fetch tax data"})
        );
    }

    #[tokio::test]
    async fn test_malformed_payload_is_internal_error() {
        let err = ApiError::from(FetchError::MalformedPayload {
            year: 2024,
            source: TransportError::Schema("missing field `rate`".into()),
        });
        assert!(matches!(&err, ApiError::Internal(detail) if detail.contains("missing field `rate`")));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Internal server error."})
        );
    }

    #[tokio::test]
    async fn test_deadline_exceeded_body() {
        let response = ApiError::DeadlineExceeded(TimedOut(std::time::Duration::from_secs(45))).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Could not fetch tax data"})
        );
    }

    #[tokio::test]
    async fn test_validation_error_body() {
        let err = ApiError::Validation(vec![FieldError::malformed_query("bad encoding")]);
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Validation failed.");
        assert_eq!(json["details"][0]["type"], "query_parsing");
    }

    #[tokio::test]
    async fn test_panic_response_is_generic() {
        let response = panic_response(Box::new("index out of bounds"));

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Internal server error."})
        );
    }

    #[test]
    fn test_error_chain() {
        let err = FetchError::UpstreamUnavailable {
            attempts: 2,
            source: TransportError::Status(503),
        };
        assert_eq!(error_chain(&err), "provider returned HTTP 503");
    }

    #[test]
    fn test_tax_response_serializes_numbers() {
        let response = TaxResponse {
            income: dec!(75000),
            year: 2024,
            total_tax: dec!(10000),
            effective_tax_rate: dec!(0.1333),
            breakdown: vec![TaxBreakdownEntry {
                min: dec!(0),
                max: None,
                rate: dec!(0.1),
                taxable_income: dec!(75000),
                tax: dec!(7500),
            }],
        };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["total_tax"].as_f64(), Some(10000.0));
        assert_eq!(json["effective_tax_rate"].as_f64(), Some(0.1333));
        assert!(json["breakdown"][0]["max"].is_null());
    }
}
