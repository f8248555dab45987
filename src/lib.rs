//! Marginal Tax Calculator API Library

pub mod config;
pub mod fetcher;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod tax;

pub use config::AppConfig;
pub use fetcher::{BracketFetcher, BracketSource};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use tax::{calculate, TaxBracket, TaxResult};
