//! Sending-identity domain model.
//!
//! An identity is a sender domain verified with the email provider and
//! scoped to a project. Sends are only permitted from identities that
//! are fully verified and have a configuration set provisioned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Provider-side verification state of a sending domain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IdentityStatus {
    Pending,
    Success,
    Failed,
    TemporaryFailure,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectIdentity {
    pub id: Uuid,
    pub project_id: Uuid,
    pub domain: String,
    pub status: IdentityStatus,
    /// Provider-side tag attached to outbound mail, enabling
    /// delivery-event tracking. Required before the identity may send.
    pub configuration_set_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to register a new sending identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectIdentity {
    pub project_id: Uuid,
    pub domain: String,
    pub status: IdentityStatus,
    pub configuration_set_name: Option<String>,
}
