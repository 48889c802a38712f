//! Integration tests for sending-identity and API-key repositories
//! using in-memory SurrealDB.

use courier_core::error::CourierError;
use courier_core::models::api_key::{ApiKeyStatus, CreateApiKey};
use courier_core::models::identity::{CreateProjectIdentity, IdentityStatus};
use courier_core::models::project::CreateProject;
use courier_core::repository::{
    ApiKeyRepository, Pagination, ProjectIdentityRepository, ProjectRepository,
};
use courier_db::repository::{
    SurrealApiKeyRepository, SurrealProjectIdentityRepository, SurrealProjectRepository,
};
use sha2::{Digest, Sha256};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: spin up in-memory DB, run migrations, create a project.
async fn setup() -> (Surreal<surrealdb::engine::local::Db>, Uuid) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    courier_db::run_migrations(&db).await.unwrap();

    let projects = SurrealProjectRepository::new(db.clone());
    let project = projects
        .create(CreateProject {
            name: "Test Project".into(),
            access_key_id: None,
            secret_access_key: None,
            region: None,
        })
        .await
        .unwrap();

    (db, project.id)
}

// -----------------------------------------------------------------------
// Identity tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn create_and_get_identity_by_domain() {
    let (db, project_id) = setup().await;
    let repo = SurrealProjectIdentityRepository::new(db);

    let identity = repo
        .create(CreateProjectIdentity {
            project_id,
            domain: "mly.fyi".into(),
            status: IdentityStatus::Success,
            configuration_set_name: Some("courier-tracking".into()),
        })
        .await
        .unwrap();

    assert_eq!(identity.domain, "mly.fyi");
    assert_eq!(identity.status, IdentityStatus::Success);

    let fetched = repo.get_by_domain(project_id, "mly.fyi").await.unwrap();
    assert_eq!(fetched.id, identity.id);
    assert_eq!(
        fetched.configuration_set_name.as_deref(),
        Some("courier-tracking")
    );
}

#[tokio::test]
async fn identity_lookup_is_project_scoped() {
    let (db, project_id) = setup().await;
    let repo = SurrealProjectIdentityRepository::new(db);

    repo.create(CreateProjectIdentity {
        project_id,
        domain: "mly.fyi".into(),
        status: IdentityStatus::Success,
        configuration_set_name: None,
    })
    .await
    .unwrap();

    // Another project does not see this identity.
    let err = repo
        .get_by_domain(Uuid::new_v4(), "mly.fyi")
        .await
        .unwrap_err();
    assert!(matches!(err, CourierError::NotFound { .. }));
}

#[tokio::test]
async fn set_status_records_verification_outcome() {
    let (db, project_id) = setup().await;
    let repo = SurrealProjectIdentityRepository::new(db);

    let identity = repo
        .create(CreateProjectIdentity {
            project_id,
            domain: "pending.example".into(),
            status: IdentityStatus::Pending,
            configuration_set_name: None,
        })
        .await
        .unwrap();

    let updated = repo
        .set_status(project_id, identity.id, IdentityStatus::Success)
        .await
        .unwrap();
    assert_eq!(updated.status, IdentityStatus::Success);
    assert!(updated.updated_at >= identity.updated_at);
}

#[tokio::test]
async fn list_identities_with_pagination() {
    let (db, project_id) = setup().await;
    let repo = SurrealProjectIdentityRepository::new(db);

    for i in 0..3 {
        repo.create(CreateProjectIdentity {
            project_id,
            domain: format!("domain-{i}.example"),
            status: IdentityStatus::Pending,
            configuration_set_name: None,
        })
        .await
        .unwrap();
    }

    let page = repo
        .list(
            project_id,
            Pagination {
                offset: 0,
                limit: 2,
            },
        )
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);
}

// -----------------------------------------------------------------------
// API key tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn create_key_returns_raw_secret_once() {
    let (db, project_id) = setup().await;
    let repo = SurrealApiKeyRepository::new(db);

    let (key, raw) = repo
        .create(CreateApiKey {
            project_id,
            name: "production".into(),
        })
        .await
        .unwrap();

    assert!(raw.starts_with("ck_"));
    assert_eq!(key.status, ApiKeyStatus::Active);
    // Stored hash matches SHA-256 of the raw secret.
    let expected = hex::encode(Sha256::digest(raw.as_bytes()));
    assert_eq!(key.token_hash, expected);
}

#[tokio::test]
async fn get_by_token_hash_round_trips() {
    let (db, project_id) = setup().await;
    let repo = SurrealApiKeyRepository::new(db);

    let (key, raw) = repo
        .create(CreateApiKey {
            project_id,
            name: "production".into(),
        })
        .await
        .unwrap();

    let hash = hex::encode(Sha256::digest(raw.as_bytes()));
    let fetched = repo.get_by_token_hash(&hash).await.unwrap();
    assert_eq!(fetched.id, key.id);
    assert_eq!(fetched.project_id, project_id);
}

#[tokio::test]
async fn unknown_hash_is_not_found() {
    let (db, _project_id) = setup().await;
    let repo = SurrealApiKeyRepository::new(db);

    let err = repo.get_by_token_hash("deadbeef").await.unwrap_err();
    assert!(matches!(err, CourierError::NotFound { .. }));
}

#[tokio::test]
async fn revoke_key() {
    let (db, project_id) = setup().await;
    let repo = SurrealApiKeyRepository::new(db);

    let (key, _raw) = repo
        .create(CreateApiKey {
            project_id,
            name: "to-revoke".into(),
        })
        .await
        .unwrap();

    let revoked = repo.revoke(project_id, key.id).await.unwrap();
    assert_eq!(revoked.status, ApiKeyStatus::Revoked);

    // The row remains resolvable by hash, still marked revoked.
    let fetched = repo.get_by_token_hash(&key.token_hash).await.unwrap();
    assert_eq!(fetched.status, ApiKeyStatus::Revoked);
}

#[tokio::test]
async fn list_keys_is_project_scoped() {
    let (db, project_id) = setup().await;
    let repo = SurrealApiKeyRepository::new(db);

    repo.create(CreateApiKey {
        project_id,
        name: "one".into(),
    })
    .await
    .unwrap();
    repo.create(CreateApiKey {
        project_id,
        name: "two".into(),
    })
    .await
    .unwrap();

    let page = repo.list(project_id, Pagination::default()).await.unwrap();
    assert_eq!(page.total, 2);

    let empty = repo
        .list(Uuid::new_v4(), Pagination::default())
        .await
        .unwrap();
    assert_eq!(empty.total, 0);
    assert!(empty.items.is_empty());
}
