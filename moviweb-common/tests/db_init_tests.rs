//! Unit tests for database initialization
//!
//! Verifies automatic database creation, idempotent schema setup, and
//! foreign key enforcement.

use moviweb_common::db::init::{create_schema, init_database};
use std::path::PathBuf;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let test_db = format!("/tmp/moviweb-test-db-{}.db", std::process::id());
    let db_path = PathBuf::from(&test_db);

    // Ensure database doesn't exist
    let _ = std::fs::remove_file(&db_path);

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");

    // Cleanup
    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_database_opens_existing() {
    let test_db = format!("/tmp/moviweb-test-db-existing-{}.db", std::process::id());
    let db_path = PathBuf::from(&test_db);

    let _ = std::fs::remove_file(&db_path);

    // Create database first time
    let pool1 = init_database(&db_path).await;
    assert!(pool1.is_ok());

    // Open database second time (should succeed)
    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());

    drop(pool1);
    drop(pool2);
    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_schema_tables_created() {
    let pool = sqlx::SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    create_schema(&pool).await.expect("Schema creation failed");

    // Running it again must be a no-op
    create_schema(&pool).await.expect("Schema creation is not idempotent");

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for expected in ["user", "movie", "user_movies", "review"] {
        assert!(
            tables.iter().any(|t| t == expected),
            "Missing table {}, got {:?}",
            expected,
            tables
        );
    }
}

#[tokio::test]
async fn test_foreign_keys_enforced() {
    let test_db = format!("/tmp/moviweb-test-db-fk-{}.db", std::process::id());
    let db_path = PathBuf::from(&test_db);
    let _ = std::fs::remove_file(&db_path);

    let pool = init_database(&db_path).await.unwrap();

    // Inserting a favorite link for nonexistent rows must violate FKs
    let result = sqlx::query("INSERT INTO user_movies (user_id, movie_id) VALUES (999, 999)")
        .execute(&pool)
        .await;

    assert!(result.is_err(), "Expected foreign key violation");

    drop(pool);
    let _ = std::fs::remove_file(&db_path);
}
