//! Database initialization
//!
//! Opens (or creates) the SQLite database and brings the schema up
//! idempotently. Safe to call on every startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Connection options apply to every pooled connection: foreign keys on,
    // WAL for concurrent readers, busy timeout instead of immediate failure
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Run migrations (idempotent - safe to call multiple times)
    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables if they don't exist
///
/// Also used by tests against in-memory pools.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_user_table(pool).await?;
    create_movie_table(pool).await?;
    create_user_movies_table(pool).await?;
    create_review_table(pool).await?;
    Ok(())
}

async fn create_user_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user (
            user_id INTEGER PRIMARY KEY AUTOINCREMENT,
            user TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_movie_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS movie (
            movie_id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL UNIQUE,
            director TEXT,
            publication_year INTEGER,
            rating REAL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_user_movies_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_movies (
            entry_id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES user(user_id),
            movie_id INTEGER NOT NULL REFERENCES movie(movie_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_review_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS review (
            review_id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES user(user_id),
            movie_id INTEGER NOT NULL REFERENCES movie(movie_id),
            review_text TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
