//! Email delivery log domain models.
//!
//! One `EmailLog` row is written per send attempt; each delivery
//! lifecycle transition is recorded as an append-only `EmailLogEvent`.
//! The send pipeline itself only ever writes `sending` or `error`;
//! the remaining states are driven by provider callbacks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmailLogStatus {
    Sending,
    Delivered,
    Bounced,
    Complained,
    Error,
}

/// Event types mirror the log status lifecycle and extend it with
/// engagement events reported by the provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmailLogEventType {
    Sending,
    Delivered,
    Bounced,
    Complained,
    Error,
    Click,
    Open,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailLog {
    pub id: Uuid,
    /// Provider-assigned message id, present once dispatch succeeded.
    pub message_id: Option<String>,
    pub project_id: Uuid,
    pub api_key_id: Uuid,
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: Option<String>,
    pub html: Option<String>,
    pub status: EmailLogStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to record a send attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEmailLog {
    pub message_id: Option<String>,
    pub project_id: Uuid,
    pub api_key_id: Uuid,
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: Option<String>,
    pub html: Option<String>,
    pub status: EmailLogStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailLogEvent {
    pub id: Uuid,
    pub email_log_id: Uuid,
    /// Recipient the event applies to.
    pub email: String,
    pub event_type: EmailLogEventType,
    pub timestamp: DateTime<Utc>,
}

/// Fields required to append a lifecycle event to a log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEmailLogEvent {
    pub email_log_id: Uuid,
    pub email: String,
    pub event_type: EmailLogEventType,
}
