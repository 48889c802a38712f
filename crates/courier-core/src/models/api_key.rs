//! API key domain model.
//!
//! An API key is the sole bearer credential for the send endpoint and
//! is bound to exactly one project. Only the SHA-256 hash of the raw
//! secret is stored; the raw secret is returned once at creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyStatus {
    Active,
    Revoked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: Uuid,
    pub project_id: Uuid,
    /// Human-readable label chosen by the project owner.
    pub name: String,
    /// SHA-256 hash of the raw key secret, hex-encoded.
    pub token_hash: String,
    pub status: ApiKeyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to issue a new API key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApiKey {
    pub project_id: Uuid,
    pub name: String,
}
