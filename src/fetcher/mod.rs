//! Bracket fetching subsystem.
//!
//! # Data Flow
//! ```text
//! year
//!     → bracket_fetcher.rs (retry loop, per-attempt timeout)
//!     → client.rs (BracketSource: GET <base>/<year>)
//!     → types.rs (BracketPayload / TransportError)
//!     → schedule check (tax::validate_schedule)
//!     → Vec<TaxBracket> or FetchError
//! ```
//!
//! # Design Decisions
//! - Transport failures are recovered locally; only terminal failure crosses
//!   the module boundary
//! - Upstream error detail is logged here and never shown to API callers
//! - No caching: every call re-fetches

pub mod bracket_fetcher;
pub mod client;
pub mod types;

pub use bracket_fetcher::BracketFetcher;
pub use client::{BracketSource, HttpBracketSource};
pub use types::{BracketPayload, FetchError, FetchResult, TransportError};
