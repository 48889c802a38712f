//! Integration tests for User and Project repository implementations
//! using in-memory SurrealDB.

use courier_core::error::CourierError;
use courier_core::models::project::{CreateProject, ProviderCredentials};
use courier_core::models::user::{AuthProvider, CreateUser};
use courier_core::repository::{ProjectRepository, UserRepository};
use courier_db::repository::{SurrealProjectRepository, SurrealUserRepository, verify_password};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    courier_db::run_migrations(&db).await.unwrap();
    db
}

// -----------------------------------------------------------------------
// User tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn create_and_get_user() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(CreateUser {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password: "correct-horse-battery".into(),
            auth_provider: AuthProvider::Email,
        })
        .await
        .unwrap();

    assert_eq!(user.name, "Alice");
    assert_eq!(user.email, "alice@example.com");
    assert!(user.is_enabled, "new accounts are enabled by default");
    assert!(user.verified_at.is_none());

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.id, user.id);
    assert_eq!(fetched.email, user.email);
}

#[tokio::test]
async fn password_is_stored_hashed() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(CreateUser {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password: "correct-horse-battery".into(),
            auth_provider: AuthProvider::Email,
        })
        .await
        .unwrap();

    assert_ne!(user.password_hash, "correct-horse-battery");
    assert!(verify_password("correct-horse-battery", &user.password_hash, None).unwrap());
    assert!(!verify_password("wrong", &user.password_hash, None).unwrap());
}

#[tokio::test]
async fn get_user_by_email() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(CreateUser {
            name: "Bob".into(),
            email: "bob@example.com".into(),
            password: "hunter2hunter2".into(),
            auth_provider: AuthProvider::Github,
        })
        .await
        .unwrap();

    let fetched = repo.get_by_email("bob@example.com").await.unwrap();
    assert_eq!(fetched.id, user.id);
    assert_eq!(fetched.auth_provider, AuthProvider::Github);
}

#[tokio::test]
async fn get_session_user_returns_minimal_view() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(CreateUser {
            name: "Carol".into(),
            email: "carol@example.com".into(),
            password: "a-long-password".into(),
            auth_provider: AuthProvider::Google,
        })
        .await
        .unwrap();

    let session_user = repo.get_session_user(user.id).await.unwrap();
    assert_eq!(session_user.id, user.id);
    assert_eq!(session_user.email, "carol@example.com");
    assert_eq!(session_user.name, "Carol");
}

#[tokio::test]
async fn get_session_user_unknown_id_is_not_found() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let err = repo.get_session_user(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, CourierError::NotFound { .. }));
}

#[tokio::test]
async fn set_enabled_disables_account() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(CreateUser {
            name: "Dave".into(),
            email: "dave@example.com".into(),
            password: "a-long-password".into(),
            auth_provider: AuthProvider::Email,
        })
        .await
        .unwrap();

    repo.set_enabled(user.id, false).await.unwrap();

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert!(!fetched.is_enabled);
}

// -----------------------------------------------------------------------
// Project tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn create_and_get_project() {
    let db = setup().await;
    let repo = SurrealProjectRepository::new(db);

    let project = repo
        .create(CreateProject {
            name: "ACME Mailer".into(),
            access_key_id: None,
            secret_access_key: None,
            region: None,
        })
        .await
        .unwrap();

    assert_eq!(project.name, "ACME Mailer");
    assert!(
        project.credentials().is_none(),
        "no credentials configured yet"
    );

    let fetched = repo.get_by_id(project.id).await.unwrap();
    assert_eq!(fetched.id, project.id);
}

#[tokio::test]
async fn set_credentials_completes_the_set() {
    let db = setup().await;
    let repo = SurrealProjectRepository::new(db);

    let project = repo
        .create(CreateProject {
            name: "ACME Mailer".into(),
            access_key_id: None,
            secret_access_key: None,
            region: None,
        })
        .await
        .unwrap();

    let updated = repo
        .set_credentials(
            project.id,
            ProviderCredentials {
                access_key_id: "AKIAEXAMPLE".into(),
                secret_access_key: "secret".into(),
                region: "eu-west-1".into(),
            },
        )
        .await
        .unwrap();

    let creds = updated.credentials().expect("credentials should be set");
    assert_eq!(creds.access_key_id, "AKIAEXAMPLE");
    assert_eq!(creds.region, "eu-west-1");
}

#[tokio::test]
async fn partial_credentials_do_not_count() {
    let db = setup().await;
    let repo = SurrealProjectRepository::new(db);

    let project = repo
        .create(CreateProject {
            name: "Half Configured".into(),
            access_key_id: Some("AKIAEXAMPLE".into()),
            secret_access_key: None,
            region: Some("us-east-1".into()),
        })
        .await
        .unwrap();

    assert!(project.credentials().is_none());
}

#[tokio::test]
async fn get_unknown_project_is_not_found() {
    let db = setup().await;
    let repo = SurrealProjectRepository::new(db);

    let err = repo.get_by_id(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, CourierError::NotFound { .. }));
}
