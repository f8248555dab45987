//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the tax API.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream bracket provider.
    pub tax_api: TaxApiConfig,

    /// Retry configuration for provider calls.
    pub retries: RetryConfig,

    /// Handling of provider payloads.
    pub brackets: BracketConfig,

    /// Inbound request timeouts.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Headroom added to the fetch budget when no request deadline is configured.
pub const REQUEST_DEADLINE_MARGIN: Duration = Duration::from_secs(5);

impl AppConfig {
    /// Longest a bracket fetch can take: every attempt timing out, plus the
    /// delays between them.
    pub fn fetch_budget(&self) -> Duration {
        let attempts = u64::from(self.retries.attempts());
        let attempt_ms = self.tax_api.timeout_secs.saturating_mul(1000);
        let total_ms = attempts
            .saturating_mul(attempt_ms)
            .saturating_add((attempts - 1).saturating_mul(self.retries.delay_ms));
        Duration::from_millis(total_ms)
    }

    /// Deadline for one calculation request: `timeouts.request_secs` when
    /// set, otherwise the fetch budget plus [`REQUEST_DEADLINE_MARGIN`].
    pub fn request_deadline(&self) -> Duration {
        match self.timeouts.request_secs {
            Some(secs) => Duration::from_secs(secs),
            None => self.fetch_budget().saturating_add(REQUEST_DEADLINE_MARGIN),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Bracket provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TaxApiConfig {
    /// Base URL; the year is appended as the last path segment.
    pub base_url: String,

    /// Deadline for a single provider call, in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for TaxApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: 10,
            connect_timeout_secs: 5,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries. When disabled a single attempt is made.
    pub enabled: bool,

    /// Total attempts when retries are enabled.
    pub max_retries: u32,

    /// Fixed delay between attempts in milliseconds.
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_retries: 3,
            delay_ms: 1000,
        }
    }
}

impl RetryConfig {
    /// Attempts made per fetch: `max_retries` when enabled, otherwise one.
    pub fn attempts(&self) -> u32 {
        if self.enabled {
            self.max_retries.max(1)
        } else {
            1
        }
    }
}

/// What to do when the provider response has no `tax_brackets` field.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingBracketsPolicy {
    /// Treat as an empty schedule (no tax owed).
    #[default]
    Empty,
    /// Fail the fetch.
    Reject,
}

/// Provider payload handling.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct BracketConfig {
    pub missing_field: MissingBracketsPolicy,
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for one calculation request in seconds. Must exceed
    /// [`AppConfig::fetch_budget`]. Derived from it when unset.
    pub request_secs: Option<u64>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
