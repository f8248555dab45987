//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, overlay environment)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → moved into the fetcher and HTTP state at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AppConfig, BracketConfig, ListenerConfig, MissingBracketsPolicy, ObservabilityConfig,
    RetryConfig, TaxApiConfig, TimeoutConfig, REQUEST_DEADLINE_MARGIN,
};
pub use validation::ValidationError;
