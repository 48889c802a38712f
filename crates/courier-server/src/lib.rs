//! Courier Server — HTTP API for transactional email sending.
//!
//! Exposed as a library so integration tests can assemble the full
//! router against an in-memory database.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod session;
pub mod state;

pub use error::ApiError;
pub use state::AppState;
