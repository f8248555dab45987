//! Tax computation subsystem.
//!
//! # Data Flow
//! ```text
//! Vec<TaxBracket> (from fetcher, already schedule-checked)
//!     → calculator.rs (marginal tax, per-bracket breakdown)
//!     → rounding.rs (currency and rate rounding)
//!     → TaxResult (total + breakdown)
//! ```
//!
//! # Design Decisions
//! - Pure functions only: no I/O, no logging of request data beyond debug
//! - Decimal arithmetic throughout; floats only appear at the JSON boundary
//! - Brackets are consumed in the order supplied, never re-sorted

pub mod bracket;
pub mod calculator;
pub mod rounding;

pub use bracket::{validate_schedule, ScheduleError, TaxBracket, TaxBreakdownEntry, TaxResult};
pub use calculator::{calculate, effective_rate};
