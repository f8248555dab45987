//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to the bracket provider:
//!     → timeouts.rs (enforce per-attempt deadline)
//!     → On failure: retries.rs (fixed delay, bounded attempt count,
//!       non-retryable errors returned at once)
//!     → On exhaustion: caller receives Exhausted { attempts, last_error }
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Fixed delay between attempts, no backoff or jitter
//! - Waiting is an async sleep, so one request's retries never stall another

pub mod retries;
pub mod timeouts;

pub use retries::{run_with_retries, run_with_retries_if, Exhausted, RetryPolicy};
pub use timeouts::{with_timeout, TimedOut};
