//! Project domain model.
//!
//! A project is the unit of tenancy: it owns the provider credentials
//! used to send on its behalf, its verified sending identities, and
//! the API keys that authorize sends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    /// Human-readable name.
    pub name: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub region: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Provider credentials a project sends with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
}

impl Project {
    /// The project's provider credentials, when all three parts are
    /// configured. A send requires the full set.
    pub fn credentials(&self) -> Option<ProviderCredentials> {
        match (&self.access_key_id, &self.secret_access_key, &self.region) {
            (Some(access_key_id), Some(secret_access_key), Some(region)) => {
                Some(ProviderCredentials {
                    access_key_id: access_key_id.clone(),
                    secret_access_key: secret_access_key.clone(),
                    region: region.clone(),
                })
            }
            _ => None,
        }
    }
}

/// Fields required to create a new project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub region: Option<String>,
}
