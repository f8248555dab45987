//! Provider payload and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resilience::TimedOut;
use crate::tax::{ScheduleError, TaxBracket};

/// Body returned by the bracket provider for one year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketPayload {
    /// Absent (or null) when the provider has nothing for the year.
    #[serde(default)]
    pub tax_brackets: Option<Vec<TaxBracket>>,
}

impl BracketPayload {
    pub fn with_brackets(brackets: Vec<TaxBracket>) -> Self {
        Self {
            tax_brackets: Some(brackets),
        }
    }
}

/// A single failed call to the provider.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection refused, reset, DNS failure and similar.
    #[error("request failed: {0}")]
    Request(String),

    #[error(transparent)]
    Timeout(#[from] TimedOut),

    /// Provider answered with a non-2xx status.
    #[error("provider returned HTTP {0}")]
    Status(u16),

    /// Body was not JSON at all.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Body was JSON but not a bracket payload (e.g. a bracket without `rate`).
    #[error("malformed bracket payload: {0}")]
    Schema(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

impl TransportError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, TransportError::Schema(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            TransportError::Status(status.as_u16())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Terminal failure of a bracket fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Every attempt failed at the transport level.
    #[error("bracket provider unavailable after {attempts} attempt(s)")]
    UpstreamUnavailable {
        attempts: u32,
        #[source]
        source: TransportError,
    },

    /// Provider answered with data that cannot be read as brackets.
    #[error("provider returned malformed bracket data for {year}")]
    MalformedPayload {
        year: i32,
        #[source]
        source: TransportError,
    },

    /// Response had no `tax_brackets` field and the policy rejects that.
    #[error("provider response for {year} has no tax_brackets field")]
    MissingBrackets { year: i32 },

    /// Brackets arrived but cannot be calculated against safely.
    #[error("provider returned an invalid schedule for {year}")]
    InvalidSchedule {
        year: i32,
        #[source]
        source: ScheduleError,
    },
}

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;
