//! Typed client for the Marginal Tax API.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One bracket's share of the total tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub min: f64,
    pub max: Option<f64>,
    pub rate: f64,
    pub taxable_income: f64,
    pub tax: f64,
}

/// Successful calculation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCalculation {
    pub income: f64,
    pub year: i32,
    pub total_tax: f64,
    pub effective_tax_rate: f64,
    pub breakdown: Vec<BreakdownEntry>,
}

/// Error body returned by the API for any non-2xx status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Error)]
pub enum TaxClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned {status}: {}", body.error)]
    Api { status: StatusCode, body: ErrorBody },
}

pub struct TaxClient {
    client: Client,
    base_url: String,
}

impl TaxClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Calculate tax for `income` in `year`.
    pub async fn calculate_tax(&self, income: f64, year: i32) -> Result<TaxCalculation, TaxClientError> {
        let resp = self.client
            .get(format!("{}/api/v1/calculate-tax", self.base_url))
            .query(&[("income", income.to_string()), ("year", year.to_string())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.json::<ErrorBody>().await?;
            return Err(TaxClientError::Api { status, body });
        }

        Ok(resp.json::<TaxCalculation>().await?)
    }

    /// True when `/health` answers 200.
    pub async fn is_healthy(&self) -> bool {
        match self.client.get(format!("{}/health", self.base_url)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}
