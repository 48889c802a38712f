//! Integration tests for schema initialization using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    courier_db::run_migrations(&db).await.unwrap();

    // Verify that key tables exist by querying INFO FOR DB.
    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = info.expect("INFO FOR DB should return a value");
    let info_str = format!("{:?}", info);

    assert!(info_str.contains("user"), "missing user table");
    assert!(info_str.contains("project"), "missing project table");
    assert!(
        info_str.contains("project_identity"),
        "missing project_identity table"
    );
    assert!(info_str.contains("api_key"), "missing api_key table");
    assert!(info_str.contains("email_log"), "missing email_log table");
    assert!(
        info_str.contains("email_log_event"),
        "missing email_log_event table"
    );

    // Verify migration was recorded.
    assert!(info_str.contains("_migration"), "missing _migration table");
}

#[tokio::test]
async fn migration_is_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    // Run twice — should not fail, and should not re-apply.
    courier_db::run_migrations(&db).await.unwrap();
    courier_db::run_migrations(&db).await.unwrap();

    use surrealdb_types::SurrealValue;

    #[derive(Debug, SurrealValue)]
    struct MigrationRow {
        version: u32,
    }

    let mut result = db.query("SELECT version FROM _migration").await.unwrap();
    let rows: Vec<MigrationRow> = result.take(0).unwrap();
    assert_eq!(rows.len(), 1, "migration v1 should be recorded exactly once");
    assert_eq!(rows[0].version, 1);
}

#[tokio::test]
async fn schema_v1_ddl_is_exposed() {
    let ddl = courier_db::schema_v1();
    assert!(ddl.contains("DEFINE TABLE email_log"));
    assert!(ddl.contains("DEFINE TABLE email_log_event"));
}
