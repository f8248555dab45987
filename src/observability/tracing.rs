//! Request spans.
//!
//! # Responsibilities
//! - Create one span per inbound request
//! - Attach the request ID so every event inside the request carries it

use axum::http::Request;
use tracing::Span;

use crate::http::request::X_REQUEST_ID;

/// Span for an inbound request; used as the `TraceLayer` span maker.
pub fn request_span<B>(request: &Request<B>) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}
