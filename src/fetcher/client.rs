//! Bracket provider access.
//!
//! # Responsibilities
//! - Define the seam the fetcher talks through (`BracketSource`)
//! - Issue `GET <base>/<year>` against the configured provider
//! - Map HTTP and decoding failures to `TransportError`
//!
//! # Design Decisions
//! - The body is parsed as JSON first and shaped into `BracketPayload`
//!   second, so a truncated body (retried) is told apart from well-formed
//!   JSON with the wrong fields (not retried)

use std::time::Duration;

use async_trait::async_trait;

use crate::config::TaxApiConfig;
use crate::fetcher::types::{BracketPayload, TransportError};

/// Anything that can produce the raw bracket payload for a year.
#[async_trait]
pub trait BracketSource: Send + Sync {
    async fn fetch_payload(&self, year: i32) -> Result<BracketPayload, TransportError>;
}

/// `BracketSource` backed by the provider's HTTP API.
#[derive(Clone)]
pub struct HttpBracketSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBracketSource {
    /// Build a client for the configured provider.
    pub fn new(config: &TaxApiConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    /// URL queried for `year`.
    pub fn url_for(&self, year: i32) -> String {
        format!("{}/{}", self.base_url, year)
    }
}

#[async_trait]
impl BracketSource for HttpBracketSource {
    async fn fetch_payload(&self, year: i32) -> Result<BracketPayload, TransportError> {
        let url = self.url_for(year);
        tracing::debug!(url = %url, "Requesting tax brackets");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        decode_payload(&body)
    }
}

/// Parse a provider body into a payload.
pub fn decode_payload(body: &[u8]) -> Result<BracketPayload, TransportError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| TransportError::Decode(e.to_string()))?;
    serde_json::from_value(value).map_err(|e| TransportError::Schema(e.to_string()))
}

impl std::fmt::Debug for HttpBracketSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBracketSource")
            .field("base_url", &self.base_url)
            .finish()
    }
}
