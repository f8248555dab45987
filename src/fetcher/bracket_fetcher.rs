//! Retrying bracket fetcher.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{AppConfig, MissingBracketsPolicy};
use crate::fetcher::client::BracketSource;
use crate::fetcher::types::{FetchError, FetchResult, TransportError};
use crate::observability::metrics;
use crate::resilience::{run_with_retries_if, with_timeout, RetryPolicy};
use crate::tax::{validate_schedule, TaxBracket};

/// Resolves a tax year to its bracket schedule.
///
/// Each call goes to the provider; nothing is cached between calls.
#[derive(Clone)]
pub struct BracketFetcher {
    source: Arc<dyn BracketSource>,
    policy: RetryPolicy,
    attempt_timeout: Duration,
    missing_field: MissingBracketsPolicy,
}

impl BracketFetcher {
    pub fn new(
        source: Arc<dyn BracketSource>,
        policy: RetryPolicy,
        attempt_timeout: Duration,
        missing_field: MissingBracketsPolicy,
    ) -> Self {
        Self {
            source,
            policy,
            attempt_timeout,
            missing_field,
        }
    }

    /// Build a fetcher using the retry, timeout and payload settings in `config`.
    pub fn from_config(source: Arc<dyn BracketSource>, config: &AppConfig) -> Self {
        Self::new(
            source,
            RetryPolicy::from_config(&config.retries),
            Duration::from_secs(config.tax_api.timeout_secs),
            config.brackets.missing_field,
        )
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch and check the schedule for `year`.
    ///
    /// Transport failures are retried per the policy. Malformed bracket data,
    /// a missing `tax_brackets` field or an invalid schedule fails immediately.
    pub async fn fetch(&self, year: i32) -> FetchResult<Vec<TaxBracket>> {
        let retryable = |e: &TransportError| e.is_retryable();
        let payload = run_with_retries_if(&self.policy, "fetch_tax_brackets", retryable, |attempt| async move {
            tracing::debug!(year, attempt, "Fetching tax brackets");

            let result = match with_timeout(self.attempt_timeout, self.source.fetch_payload(year)).await {
                Ok(result) => result,
                Err(timed_out) => Err(TransportError::from(timed_out)),
            };

            metrics::record_fetch_attempt(if result.is_ok() { "success" } else { "failure" });
            result
        })
        .await
        .map_err(|exhausted| {
            if exhausted.last_error.is_retryable() {
                FetchError::UpstreamUnavailable {
                    attempts: exhausted.attempts,
                    source: exhausted.last_error,
                }
            } else {
                FetchError::MalformedPayload {
                    year,
                    source: exhausted.last_error,
                }
            }
        })?;

        let brackets = match payload.tax_brackets {
            Some(brackets) => brackets,
            None => match self.missing_field {
                MissingBracketsPolicy::Empty => {
                    tracing::warn!(year, "Provider response has no tax_brackets field, using empty schedule");
                    Vec::new()
                }
                MissingBracketsPolicy::Reject => {
                    return Err(FetchError::MissingBrackets { year });
                }
            },
        };

        validate_schedule(&brackets).map_err(|source| FetchError::InvalidSchedule { year, source })?;

        tracing::debug!(year, count = brackets.len(), "Tax brackets received");
        Ok(brackets)
    }
}

impl std::fmt::Debug for BracketFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BracketFetcher")
            .field("policy", &self.policy)
            .field("attempt_timeout", &self.attempt_timeout)
            .field("missing_field", &self.missing_field)
            .finish()
    }
}
