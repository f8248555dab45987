//! Marginal Tax Calculator API
//!
//! Computes federal income tax for an income and tax year using marginal
//! bracket rates fetched from an external provider.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────────┐
//!                    │                  MARGINAL TAX API                    │
//!                    │                                                      │
//!  GET /api/v1/      │  ┌──────────┐   ┌──────────────┐   ┌─────────────┐   │
//!  calculate-tax ────┼─▶│   http   │──▶│   fetcher    │──▶│   Bracket   │───┼──▶ Bracket
//!                    │  │ validate │   │ retry+timeout│   │   Source    │   │    Provider
//!                    │  └────┬─────┘   └──────┬───────┘   └─────────────┘   │
//!                    │       │                │ Vec<TaxBracket>             │
//!                    │       │                ▼                             │
//!                    │       │         ┌──────────────┐                     │
//!  JSON response ◀───┼───────┴─────────│     tax      │                     │
//!                    │                 │  calculator  │                     │
//!                    │                 └──────────────┘                     │
//!                    │                                                      │
//!                    │  config · observability · resilience · lifecycle     │
//!                    └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use marginal_tax_api::config::load_config;
use marginal_tax_api::observability::{logging, metrics};
use marginal_tax_api::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "marginal-tax-api")]
#[command(about = "Marginal tax calculation service", long_about = None)]
struct Args {
    /// TOML configuration file. Environment variables override its values.
    #[arg(short, long, env = "TAX_API_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!("marginal-tax-api v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        tax_api_base = %config.tax_api.base_url,
        bind_address = %config.listener.bind_address,
        retry_enabled = config.retries.enabled,
        max_retries = config.retries.max_retries,
        request_deadline_ms = config.request_deadline().as_millis() as u64,
        log_level = %config.observability.log_level,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
