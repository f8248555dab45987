//! Configuration loading from disk and environment.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment variable {var}='{value}' is invalid")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Base URL of the bracket provider.
pub const ENV_TAX_API_BASE: &str = "TAX_API_BASE";
/// Port to listen on; keeps the configured host.
pub const ENV_APP_PORT: &str = "APP_PORT";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_RETRY_ENABLED: &str = "API_RETRY_ENABLED";
pub const ENV_MAX_RETRIES: &str = "API_MAX_RETRIES";

/// Load configuration from an optional TOML file, overlay the process
/// environment, and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment values onto `config`. `lookup` resolves a variable name.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base) = lookup(ENV_TAX_API_BASE) {
        config.tax_api.base_url = base;
    }

    if let Some(raw) = lookup(ENV_APP_PORT) {
        let port: u16 = raw.trim().parse().map_err(|_| ConfigError::Env {
            var: ENV_APP_PORT,
            value: raw.clone(),
        })?;
        config.listener.bind_address = match config.listener.bind_address.parse::<SocketAddr>() {
            Ok(mut addr) => {
                addr.set_port(port);
                addr.to_string()
            }
            Err(_) => format!("0.0.0.0:{port}"),
        };
    }

    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.observability.log_level = level.to_ascii_lowercase();
    }

    if let Some(raw) = lookup(ENV_RETRY_ENABLED) {
        config.retries.enabled = parse_bool(&raw).ok_or(ConfigError::Env {
            var: ENV_RETRY_ENABLED,
            value: raw.clone(),
        })?;
    }

    if let Some(raw) = lookup(ENV_MAX_RETRIES) {
        config.retries.max_retries = raw.trim().parse().map_err(|_| ConfigError::Env {
            var: ENV_MAX_RETRIES,
            value: raw.clone(),
        })?;
    }

    Ok(())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
