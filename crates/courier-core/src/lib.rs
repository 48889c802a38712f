//! Courier Core — domain models, error taxonomy, and repository traits.
//!
//! This crate has no I/O of its own. The database crate implements the
//! repository traits; the auth, send, and server crates consume them.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{CourierError, CourierResult};
