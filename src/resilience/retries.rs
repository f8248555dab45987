//! Retry logic.
//!
//! # Responsibilities
//! - Derive the attempt budget from configuration
//! - Re-run a failing operation after a fixed delay
//! - Hand the last error back once the budget is spent
//!
//! # Design Decisions
//! - Callers classify errors; a non-retryable error ends the loop at once
//! - Disabled retries still means one attempt

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::config::RetryConfig;

/// Attempt budget and spacing for one retried operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// A policy that makes exactly one attempt.
    pub fn single_attempt() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// `max_retries` attempts when retries are enabled, otherwise one.
    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.attempts(), Duration::from_millis(config.delay_ms))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// All attempts failed.
#[derive(Debug)]
pub struct Exhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

/// Run `op` until it succeeds or the policy's attempts are used up.
///
/// `op` receives the 1-based attempt number. Every error is retried.
pub async fn run_with_retries<T, E, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    op: F,
) -> Result<T, Exhausted<E>>
where
    E: Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    run_with_retries_if(policy, operation, |_| true, op).await
}

/// Like [`run_with_retries`], but stops at the first error for which
/// `is_retryable` returns false.
pub async fn run_with_retries_if<T, E, P, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    is_retryable: P,
    mut op: F,
) -> Result<T, Exhausted<E>>
where
    E: Display,
    P: Fn(&E) -> bool,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if !is_retryable(&error) {
                    tracing::warn!(operation, attempt, error = %error, "Non-retryable error");
                    return Err(Exhausted {
                        attempts: attempt,
                        last_error: error,
                    });
                }

                tracing::warn!(
                    operation,
                    attempt,
                    max_attempts = policy.max_attempts,
                    error = %error,
                    "Attempt failed"
                );

                if attempt >= policy.max_attempts {
                    tracing::error!(operation, attempts = attempt, "All attempts failed");
                    return Err(Exhausted {
                        attempts: attempt,
                        last_error: error,
                    });
                }

                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}
