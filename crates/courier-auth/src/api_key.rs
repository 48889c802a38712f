//! API-key authentication for the send endpoint.
//!
//! The presented secret is hashed and resolved against the key store;
//! the key's owning project is then loaded. Everything fails closed:
//! a missing, unknown, or revoked key never reaches the pipeline.

use courier_core::error::{CourierError, CourierResult};
use courier_core::models::api_key::{ApiKey, ApiKeyStatus};
use courier_core::models::project::Project;
use courier_core::repository::{ApiKeyRepository, ProjectRepository};
use sha2::{Digest, Sha256};

use crate::error::AuthError;

/// SHA-256 hash of a presented API key secret, hex-encoded.
///
/// Must match the hashing applied by the key store at creation time.
pub fn hash_api_key(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

/// Resolved caller context: the presented key and its owning project.
#[derive(Debug, Clone)]
pub struct AuthenticatedKey {
    pub api_key: ApiKey,
    pub project: Project,
}

/// Authenticates API-key credentials against the key and project
/// stores.
///
/// Generic over repository implementations so the auth layer has no
/// dependency on the database crate.
pub struct ApiKeyAuthenticator<K: ApiKeyRepository, P: ProjectRepository> {
    keys: K,
    projects: P,
}

impl<K: ApiKeyRepository, P: ProjectRepository> ApiKeyAuthenticator<K, P> {
    pub fn new(keys: K, projects: P) -> Self {
        Self { keys, projects }
    }

    /// Resolve the value of the credential header to a key + project.
    ///
    /// Errors:
    /// - `AuthenticationFailed` for a missing, unknown, or revoked key.
    /// - `NotFound` when the key's backing project no longer exists.
    pub async fn authenticate(&self, presented: Option<&str>) -> CourierResult<AuthenticatedKey> {
        let presented = presented
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::MissingApiKey)?;

        let token_hash = hash_api_key(presented);
        let api_key = match self.keys.get_by_token_hash(&token_hash).await {
            Ok(key) => key,
            Err(CourierError::NotFound { .. }) => {
                return Err(AuthError::InvalidApiKey.into());
            }
            Err(other) => return Err(other),
        };

        if api_key.status == ApiKeyStatus::Revoked {
            return Err(AuthError::ApiKeyRevoked.into());
        }

        let project = self.projects.get_by_id(api_key.project_id).await?;

        Ok(AuthenticatedKey { api_key, project })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic_hex() {
        let h1 = hash_api_key("ck_some-secret");
        let h2 = hash_api_key("ck_some-secret");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
        assert!(h1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn different_keys_different_hashes() {
        assert_ne!(hash_api_key("ck_a"), hash_api_key("ck_b"));
    }
}
