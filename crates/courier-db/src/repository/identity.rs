//! SurrealDB implementation of [`ProjectIdentityRepository`].

use chrono::{DateTime, Utc};
use courier_core::error::CourierResult;
use courier_core::models::identity::{CreateProjectIdentity, IdentityStatus, ProjectIdentity};
use courier_core::repository::{PaginatedResult, Pagination, ProjectIdentityRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct IdentityRow {
    project_id: String,
    domain: String,
    status: String,
    configuration_set_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct IdentityRowWithId {
    record_id: String,
    project_id: String,
    domain: String,
    status: String,
    configuration_set_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_status(s: &str) -> Result<IdentityStatus, DbError> {
    match s {
        "pending" => Ok(IdentityStatus::Pending),
        "success" => Ok(IdentityStatus::Success),
        "failed" => Ok(IdentityStatus::Failed),
        "temporary_failure" => Ok(IdentityStatus::TemporaryFailure),
        other => Err(DbError::Decode(format!("unknown identity status: {other}"))),
    }
}

fn status_to_string(s: &IdentityStatus) -> &'static str {
    match s {
        IdentityStatus::Pending => "pending",
        IdentityStatus::Success => "success",
        IdentityStatus::Failed => "failed",
        IdentityStatus::TemporaryFailure => "temporary_failure",
    }
}

impl IdentityRow {
    fn into_identity(self, id: Uuid) -> Result<ProjectIdentity, DbError> {
        let project_id = Uuid::parse_str(&self.project_id)
            .map_err(|e| DbError::Decode(format!("invalid project UUID: {e}")))?;
        Ok(ProjectIdentity {
            id,
            project_id,
            domain: self.domain,
            status: parse_status(&self.status)?,
            configuration_set_name: self.configuration_set_name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl IdentityRowWithId {
    fn try_into_identity(self) -> Result<ProjectIdentity, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let project_id = Uuid::parse_str(&self.project_id)
            .map_err(|e| DbError::Decode(format!("invalid project UUID: {e}")))?;
        Ok(ProjectIdentity {
            id,
            project_id,
            domain: self.domain,
            status: parse_status(&self.status)?,
            configuration_set_name: self.configuration_set_name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the sending-identity repository.
#[derive(Clone)]
pub struct SurrealProjectIdentityRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProjectIdentityRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ProjectIdentityRepository for SurrealProjectIdentityRepository<C> {
    async fn create(&self, input: CreateProjectIdentity) -> CourierResult<ProjectIdentity> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('project_identity', $id) SET \
                 project_id = $project_id, \
                 domain = $domain, \
                 status = $status, \
                 configuration_set_name = $configuration_set_name",
            )
            .bind(("id", id_str.clone()))
            .bind(("project_id", input.project_id.to_string()))
            .bind(("domain", input.domain))
            .bind(("status", status_to_string(&input.status).to_string()))
            .bind(("configuration_set_name", input.configuration_set_name))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<IdentityRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "project_identity".into(),
            id: id_str,
        })?;

        Ok(row.into_identity(id)?)
    }

    async fn get_by_id(&self, project_id: Uuid, id: Uuid) -> CourierResult<ProjectIdentity> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('project_identity', $id) \
                 WHERE project_id = $project_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("project_id", project_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<IdentityRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "project_identity".into(),
            id: id_str,
        })?;

        Ok(row.into_identity(id)?)
    }

    async fn get_by_domain(&self, project_id: Uuid, domain: &str) -> CourierResult<ProjectIdentity> {
        let domain_owned = domain.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM project_identity \
                 WHERE project_id = $project_id AND domain = $domain",
            )
            .bind(("project_id", project_id.to_string()))
            .bind(("domain", domain_owned.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<IdentityRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "project_identity".into(),
            id: format!("domain={domain_owned}"),
        })?;

        Ok(row.try_into_identity()?)
    }

    async fn set_status(
        &self,
        project_id: Uuid,
        id: Uuid,
        status: IdentityStatus,
    ) -> CourierResult<ProjectIdentity> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('project_identity', $id) SET \
                 status = $status, updated_at = time::now() \
                 WHERE project_id = $project_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("project_id", project_id.to_string()))
            .bind(("status", status_to_string(&status).to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<IdentityRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "project_identity".into(),
            id: id_str,
        })?;

        Ok(row.into_identity(id)?)
    }

    async fn list(
        &self,
        project_id: Uuid,
        pagination: Pagination,
    ) -> CourierResult<PaginatedResult<ProjectIdentity>> {
        let project_id_str = project_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM project_identity \
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
                "SELECT meta::id(id) AS record_id, * FROM project_identity \
                 WHERE project_id = $project_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("project_id", project_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<IdentityRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_identity())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
