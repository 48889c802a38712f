//! SurrealDB implementation of [`ApiKeyRepository`].
//!
//! The raw key secret is generated here at creation time and returned
//! exactly once; only its SHA-256 hash is persisted. Lookup is by
//! hash, so a leaked database never yields usable credentials.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use courier_core::error::CourierResult;
use courier_core::models::api_key::{ApiKey, ApiKeyStatus, CreateApiKey};
use courier_core::repository::{ApiKeyRepository, PaginatedResult, Pagination};
use sha2::{Digest, Sha256};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// Prefix identifying Courier API keys in the wild.
const KEY_PREFIX: &str = "ck_";

#[derive(Debug, SurrealValue)]
struct ApiKeyRow {
    project_id: String,
    name: String,
    token_hash: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ApiKeyRowWithId {
    record_id: String,
    project_id: String,
    name: String,
    token_hash: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_status(s: &str) -> Result<ApiKeyStatus, DbError> {
    match s {
        "active" => Ok(ApiKeyStatus::Active),
        "revoked" => Ok(ApiKeyStatus::Revoked),
        other => Err(DbError::Decode(format!("unknown api key status: {other}"))),
    }
}

impl ApiKeyRow {
    fn into_api_key(self, id: Uuid) -> Result<ApiKey, DbError> {
        let project_id = Uuid::parse_str(&self.project_id)
            .map_err(|e| DbError::Decode(format!("invalid project UUID: {e}")))?;
        Ok(ApiKey {
            id,
            project_id,
            name: self.name,
            token_hash: self.token_hash,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl ApiKeyRowWithId {
    fn try_into_api_key(self) -> Result<ApiKey, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let project_id = Uuid::parse_str(&self.project_id)
            .map_err(|e| DbError::Decode(format!("invalid project UUID: {e}")))?;
        Ok(ApiKey {
            id,
            project_id,
            name: self.name,
            token_hash: self.token_hash,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Generate a raw API key secret: `ck_` + 32 random bytes,
/// base64url-encoded without padding.
fn generate_key() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rand::Rng::random(&mut rng);
    format!("{KEY_PREFIX}{}", URL_SAFE_NO_PAD.encode(bytes))
}

/// SHA-256 hash of a raw key secret, hex-encoded.
fn hash_key(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

/// SurrealDB implementation of the API key repository.
#[derive(Clone)]
pub struct SurrealApiKeyRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealApiKeyRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ApiKeyRepository for SurrealApiKeyRepository<C> {
    async fn create(&self, input: CreateApiKey) -> CourierResult<(ApiKey, String)> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let raw_key = generate_key();
        let token_hash = hash_key(&raw_key);

        let result = self
            .db
            .query(
                "CREATE type::record('api_key', $id) SET \
                 project_id = $project_id, \
                 name = $name, \
                 token_hash = $token_hash, \
                 status = 'active'",
            )
            .bind(("id", id_str.clone()))
            .bind(("project_id", input.project_id.to_string()))
            .bind(("name", input.name))
            .bind(("token_hash", token_hash))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ApiKeyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "api_key".into(),
            id: id_str,
        })?;

        Ok((row.into_api_key(id)?, raw_key))
    }

    async fn get_by_token_hash(&self, token_hash: &str) -> CourierResult<ApiKey> {
        let hash_owned = token_hash.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM api_key \
                 WHERE token_hash = $token_hash",
            )
            .bind(("token_hash", hash_owned))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ApiKeyRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "api_key".into(),
            id: "token_hash=<redacted>".into(),
        })?;

        Ok(row.try_into_api_key()?)
    }

    async fn revoke(&self, project_id: Uuid, id: Uuid) -> CourierResult<ApiKey> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('api_key', $id) SET \
                 status = 'revoked', updated_at = time::now() \
                 WHERE project_id = $project_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("project_id", project_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ApiKeyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "api_key".into(),
            id: id_str,
        })?;

        Ok(row.into_api_key(id)?)
    }

    async fn list(
        &self,
        project_id: Uuid,
        pagination: Pagination,
    ) -> CourierResult<PaginatedResult<ApiKey>> {
        let project_id_str = project_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM api_key \
                 WHERE project_id = $project_id GROUP ALL",
            )
            .bind(("project_id", project_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM api_key \
                 WHERE project_id = $project_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("project_id", project_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ApiKeyRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_api_key())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
