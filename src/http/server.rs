//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, panic recovery)
//! - Build the bracket fetcher from configuration
//! - Serve on a listener until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::fetcher::{BracketFetcher, BracketSource, HttpBracketSource, TransportError};
use crate::http::handlers;
use crate::http::request::UuidRequestId;
use crate::http::response::panic_response;
use crate::lifecycle::wait_for_shutdown;
use crate::observability::tracing::request_span;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<BracketFetcher>,
    /// Deadline for one calculation, enforced in the handler so expiry
    /// renders as a JSON error.
    pub request_timeout: Duration,
}

/// HTTP server for the tax API.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a server that fetches brackets from the configured provider.
    pub fn new(config: AppConfig) -> Result<Self, TransportError> {
        let source = Arc::new(HttpBracketSource::new(&config.tax_api)?);
        Ok(Self::with_source(config, source))
    }

    /// Create a server backed by an arbitrary bracket source.
    pub fn with_source(config: AppConfig, source: Arc<dyn BracketSource>) -> Self {
        let fetcher = Arc::new(BracketFetcher::from_config(source, &config));
        let state = AppState {
            fetcher,
            request_timeout: config.request_deadline(),
        };

        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/api/v1/calculate-tax", get(handlers::calculate_tax))
            .route("/health", get(handlers::health))
            .fallback(handlers::not_found)
            .with_state(state)
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(request_span::<Body>))
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires or the process is signalled.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            provider = %self.config.tax_api.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
