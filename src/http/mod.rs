//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, query validation)
//!     → handlers.rs (fetch brackets, calculate)
//!     → response.rs (JSON body or mapped error)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{CalculateTaxParams, FieldError, TaxQuery, X_REQUEST_ID};
pub use response::{ApiError, TaxResponse};
pub use server::{AppState, HttpServer};
