//! Database initialization
//!
//! Creates the SQLite database on first run and applies the schema
//! idempotently. All tables use `CREATE TABLE IF NOT EXISTS` so startup
//! is safe against both fresh and existing databases.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Initialize database connection pool and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Create the database file if it doesn't exist (mode=rwc)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Foreign keys enforce category referential integrity and
    // rating cleanup on article deletion
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers while rating submissions write
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    // Bound lock waits so a busy database fails the request instead of
    // hanging it indefinitely
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Connect to an in-memory database with the full schema applied.
///
/// Single connection only: each SQLite `:memory:` connection is its own
/// database, so a larger pool would see empty tables.
pub async fn connect_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;
    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables (idempotent - safe to call multiple times)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_categories_table(pool).await?;
    create_articles_table(pool).await?;
    create_ratings_table(pool).await?;
    create_admin_users_table(pool).await?;
    Ok(())
}

async fn create_categories_table(pool: &SqlitePool) -> Result<()> {
    // COLLATE NOCASE makes the name uniqueness case-insensitive at the
    // store level ("Network" and "network" collide)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE COLLATE NOCASE,
            description TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_articles_table(pool: &SqlitePool) -> Result<()> {
    // average_rating and total_ratings are derived fields, written only
    // by the rating aggregator
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS articles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            category_id INTEGER NOT NULL REFERENCES categories(id),
            tags TEXT NOT NULL DEFAULT '[]',
            image_urls TEXT NOT NULL DEFAULT '[]',
            view_count INTEGER NOT NULL DEFAULT 0,
            average_rating REAL NOT NULL DEFAULT 0,
            total_ratings INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_articles_category ON articles(category_id)")
        .execute(pool)
        .await?;
    Ok(())
}

async fn create_ratings_table(pool: &SqlitePool) -> Result<()> {
    // The composite unique constraint is the authoritative
    // one-rating-per-(article, submitter) mechanism; submissions use an
    // ON CONFLICT upsert against it
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ratings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            article_id INTEGER NOT NULL REFERENCES articles(id) ON DELETE CASCADE,
            submitter TEXT NOT NULL,
            rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
            feedback TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE (article_id, submitter)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_ratings_article ON ratings(article_id)")
        .execute(pool)
        .await?;
    Ok(())
}

async fn create_admin_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS admin_users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}
