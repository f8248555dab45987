//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, attempts > 0)
//! - Check addresses and the provider URL parse
//! - Require the request deadline to outlast the worst-case bracket fetch
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("tax_api.base_url is required")]
    MissingBaseUrl,

    #[error("tax_api.base_url '{0}' is not a valid http(s) URL")]
    InvalidBaseUrl(String),

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error(
        "timeouts.request_secs ({request_secs}s) must exceed the worst-case bracket fetch ({fetch_budget_ms}ms)"
    )]
    RequestDeadlineTooShort { request_secs: u64, fetch_budget_ms: u64 },

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Check a loaded configuration for semantic errors.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let base = config.tax_api.base_url.trim();
    if base.is_empty() {
        errors.push(ValidationError::MissingBaseUrl);
    } else {
        match Url::parse(base) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => errors.push(ValidationError::InvalidBaseUrl(base.to_string())),
        }
    }

    if config.tax_api.timeout_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "tax_api.timeout_secs",
        });
    }
    if config.tax_api.connect_timeout_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "tax_api.connect_timeout_secs",
        });
    }
    if config.retries.max_retries == 0 {
        errors.push(ValidationError::Zero {
            field: "retries.max_retries",
        });
    }
    match config.timeouts.request_secs {
        Some(0) => errors.push(ValidationError::Zero {
            field: "timeouts.request_secs",
        }),
        Some(secs) if Duration::from_secs(secs) <= config.fetch_budget() => {
            errors.push(ValidationError::RequestDeadlineTooShort {
                request_secs: secs,
                fetch_budget_ms: u64::try_from(config.fetch_budget().as_millis()).unwrap_or(u64::MAX),
            });
        }
        _ => {}
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
