//! Category table access

use kb_common::db::models::Category;
use kb_common::Result;
use sqlx::SqlitePool;

/// List all categories, name ascending (case-insensitive order)
pub async fn list(db: &SqlitePool) -> Result<Vec<Category>> {
    let rows = sqlx::query_as::<_, Category>(
        "SELECT * FROM categories ORDER BY name COLLATE NOCASE ASC",
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(db: &SqlitePool, id: i64) -> Result<Option<Category>> {
    let row = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

/// Case-insensitive name lookup, optionally excluding one row (used when
/// renaming a category to something another category already holds)
pub async fn find_by_name_ci(
    db: &SqlitePool,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<Option<Category>> {
    let row = match exclude_id {
        Some(id) => {
            sqlx::query_as::<_, Category>(
                "SELECT * FROM categories WHERE name = ? COLLATE NOCASE AND id != ?",
            )
            .bind(name)
            .bind(id)
            .fetch_optional(db)
            .await?
        }
        None => {
            sqlx::query_as::<_, Category>(
                "SELECT * FROM categories WHERE name = ? COLLATE NOCASE",
            )
            .bind(name)
            .fetch_optional(db)
            .await?
        }
    };
    Ok(row)
}

pub async fn insert(db: &SqlitePool, name: &str, description: Option<&str>) -> Result<Category> {
    let row = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name, description) VALUES (?, ?) RETURNING *",
    )
    .bind(name)
    .bind(description)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update(
    db: &SqlitePool,
    id: i64,
    name: &str,
    description: Option<&str>,
) -> Result<Option<Category>> {
    let row = sqlx::query_as::<_, Category>(
        "UPDATE categories SET name = ?, description = ? WHERE id = ? RETURNING *",
    )
    .bind(name)
    .bind(description)
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Delete a category; the FK on articles rejects this while articles
/// still reference it. Returns the number of rows deleted.
pub async fn delete(db: &SqlitePool, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

/// Count of articles referencing a category
pub async fn article_count(db: &SqlitePool, category_id: i64) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles WHERE category_id = ?")
        .bind(category_id)
        .fetch_one(db)
        .await?;
    Ok(count)
}
