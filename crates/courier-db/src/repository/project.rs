//! SurrealDB implementation of [`ProjectRepository`].

use chrono::{DateTime, Utc};
use courier_core::error::CourierResult;
use courier_core::models::project::{CreateProject, Project, ProviderCredentials};
use courier_core::repository::ProjectRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ProjectRow {
    name: String,
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    region: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProjectRow {
    fn into_project(self, id: Uuid) -> Project {
        Project {
            id,
            name: self.name,
            access_key_id: self.access_key_id,
            secret_access_key: self.secret_access_key,
            region: self.region,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// SurrealDB implementation of the Project repository.
#[derive(Clone)]
pub struct SurrealProjectRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProjectRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ProjectRepository for SurrealProjectRepository<C> {
    async fn create(&self, input: CreateProject) -> CourierResult<Project> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('project', $id) SET \
                 name = $name, \
                 access_key_id = $access_key_id, \
                 secret_access_key = $secret_access_key, \
                 region = $region",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("access_key_id", input.access_key_id))
            .bind(("secret_access_key", input.secret_access_key))
            .bind(("region", input.region))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "project".into(),
            id: id_str,
        })?;

        Ok(row.into_project(id))
    }

    async fn get_by_id(&self, id: Uuid) -> CourierResult<Project> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('project', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "project".into(),
            id: id_str,
        })?;

        Ok(row.into_project(id))
    }

    async fn set_credentials(
        &self,
        id: Uuid,
        credentials: ProviderCredentials,
    ) -> CourierResult<Project> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('project', $id) SET \
                 access_key_id = $access_key_id, \
                 secret_access_key = $secret_access_key, \
                 region = $region, \
                 updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("access_key_id", credentials.access_key_id))
            .bind(("secret_access_key", credentials.secret_access_key))
            .bind(("region", credentials.region))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "project".into(),
            id: id_str,
        })?;

        Ok(row.into_project(id))
    }
}
