//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users (dashboard accounts, global scope)
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD is_enabled ON TABLE user TYPE bool DEFAULT true;
DEFINE FIELD auth_provider ON TABLE user TYPE string \
    ASSERT $value IN ['github', 'google', 'email'];
DEFINE FIELD verification_code ON TABLE user TYPE option<string>;
DEFINE FIELD verification_code_expires_at ON TABLE user \
    TYPE option<datetime>;
DEFINE FIELD reset_password_code ON TABLE user TYPE option<string>;
DEFINE FIELD reset_password_code_expires_at ON TABLE user \
    TYPE option<datetime>;
DEFINE FIELD verified_at ON TABLE user TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;

-- =======================================================================
-- Projects (global scope)
-- =======================================================================
DEFINE TABLE project SCHEMAFULL;
DEFINE FIELD name ON TABLE project TYPE string;
DEFINE FIELD access_key_id ON TABLE project TYPE option<string>;
DEFINE FIELD secret_access_key ON TABLE project TYPE option<string>;
DEFINE FIELD region ON TABLE project TYPE option<string>;
DEFINE FIELD created_at ON TABLE project TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE project TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Sending identities (project scope)
-- =======================================================================
DEFINE TABLE project_identity SCHEMAFULL;
DEFINE FIELD project_id ON TABLE project_identity TYPE string;
DEFINE FIELD domain ON TABLE project_identity TYPE string;
DEFINE FIELD status ON TABLE project_identity TYPE string \
    ASSERT $value IN ['pending', 'success', 'failed', \
    'temporary_failure'];
DEFINE FIELD configuration_set_name ON TABLE project_identity \
    TYPE option<string>;
DEFINE FIELD created_at ON TABLE project_identity TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE project_identity TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_identity_project_domain ON TABLE project_identity \
    COLUMNS project_id, domain UNIQUE;

-- =======================================================================
-- API keys (project scope)
-- =======================================================================
DEFINE TABLE api_key SCHEMAFULL;
DEFINE FIELD project_id ON TABLE api_key TYPE string;
DEFINE FIELD name ON TABLE api_key TYPE string;
DEFINE FIELD token_hash ON TABLE api_key TYPE string;
DEFINE FIELD status ON TABLE api_key TYPE string \
    ASSERT $value IN ['active', 'revoked'];
DEFINE FIELD created_at ON TABLE api_key TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE api_key TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_api_key_token ON TABLE api_key \
    COLUMNS token_hash UNIQUE;
DEFINE INDEX idx_api_key_project ON TABLE api_key COLUMNS project_id;

-- =======================================================================
-- Email logs (project scope, one row per send attempt)
-- =======================================================================
DEFINE TABLE email_log SCHEMAFULL;
DEFINE FIELD message_id ON TABLE email_log TYPE option<string>;
DEFINE FIELD project_id ON TABLE email_log TYPE string;
DEFINE FIELD api_key_id ON TABLE email_log TYPE string;
DEFINE FIELD from_address ON TABLE email_log TYPE string;
DEFINE FIELD to_address ON TABLE email_log TYPE string;
DEFINE FIELD reply_to ON TABLE email_log TYPE option<string>;
DEFINE FIELD subject ON TABLE email_log TYPE string;
DEFINE FIELD text_body ON TABLE email_log TYPE option<string>;
DEFINE FIELD html_body ON TABLE email_log TYPE option<string>;
DEFINE FIELD status ON TABLE email_log TYPE string \
    ASSERT $value IN ['sending', 'delivered', 'bounced', \
    'complained', 'error'];
DEFINE FIELD created_at ON TABLE email_log TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE email_log TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_email_log_project_time ON TABLE email_log \
    COLUMNS project_id, created_at;

-- =======================================================================
-- Email log events (append-only)
-- =======================================================================
DEFINE TABLE email_log_event SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete NONE;
DEFINE FIELD email_log_id ON TABLE email_log_event TYPE string;
DEFINE FIELD email ON TABLE email_log_event TYPE string;
DEFINE FIELD event_type ON TABLE email_log_event TYPE string \
    ASSERT $value IN ['sending', 'delivered', 'bounced', \
    'complained', 'error', 'click', 'open'];
DEFINE FIELD timestamp ON TABLE email_log_event TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_email_log_event_log ON TABLE email_log_event \
    COLUMNS email_log_id;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
