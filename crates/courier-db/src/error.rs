//! Database-specific error types and conversions.

use courier_core::error::CourierError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Row decode failed: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for CourierError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => CourierError::NotFound { entity, id },
            other => CourierError::Database(other.to_string()),
        }
    }
}
