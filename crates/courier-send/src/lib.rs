//! Courier Send — the send-email pipeline.
//!
//! Orchestrates identity resolution, credential checks, provider
//! dispatch, and delivery logging for a single outbound message.

mod service;

pub use service::{SendEmail, SendOutcome, SendService};
