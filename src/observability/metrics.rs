//! Metrics collection and exposition.
//!
//! # Metrics
//! - `tax_requests_total` (counter): calculation requests by response status
//! - `tax_request_duration_seconds` (histogram): handler latency
//! - `bracket_fetch_attempts_total` (counter): provider calls by outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished calculation request.
pub fn record_request(status: u16, start: Instant) {
    let status = status.to_string();
    metrics::counter!("tax_requests_total", "status" => status.clone()).increment(1);
    metrics::histogram!("tax_request_duration_seconds", "status" => status)
        .record(start.elapsed().as_secs_f64());
}

/// Record one call to the bracket provider.
pub fn record_fetch_attempt(outcome: &'static str) {
    metrics::counter!("bracket_fetch_attempts_total", "outcome" => outcome).increment(1);
}
