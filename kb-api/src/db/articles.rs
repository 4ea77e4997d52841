//! Article table access
//!
//! All SELECTs join the owning category so the model's `category_name`
//! column is always present.

use kb_common::db::models::Article;
use kb_common::Result;
use sqlx::types::Json;
use sqlx::SqlitePool;

const SELECT_ARTICLE: &str = "SELECT a.id, a.title, a.content, a.category_id, \
     c.name AS category_name, a.tags, a.image_urls, a.view_count, \
     a.average_rating, a.total_ratings, a.created_at, a.updated_at \
     FROM articles a LEFT JOIN categories c ON c.id = a.category_id";

/// Filters for article listing
#[derive(Debug, Clone, Default)]
pub struct ArticleFilters {
    /// Exact-match category filter
    pub category_id: Option<i64>,
    /// Case-insensitive substring search over title and content
    pub search: Option<String>,
    /// Maximum rows to return
    pub limit: i64,
}

/// List articles, newest first, with optional filters
pub async fn list(db: &SqlitePool, filters: &ArticleFilters) -> Result<Vec<Article>> {
    let mut sql = format!("{SELECT_ARTICLE} WHERE 1=1");
    if filters.category_id.is_some() {
        sql.push_str(" AND a.category_id = ?");
    }
    if filters.search.is_some() {
        // SQLite LIKE is case-insensitive for ASCII
        sql.push_str(" AND (a.title LIKE ? OR a.content LIKE ?)");
    }
    sql.push_str(" ORDER BY a.created_at DESC, a.id DESC LIMIT ?");

    let mut query = sqlx::query_as::<_, Article>(&sql);
    if let Some(category_id) = filters.category_id {
        query = query.bind(category_id);
    }
    if let Some(search) = &filters.search {
        let pattern = format!("%{}%", search);
        query = query.bind(pattern.clone()).bind(pattern);
    }
    let rows = query.bind(filters.limit).fetch_all(db).await?;
    Ok(rows)
}

pub async fn find_by_id(db: &SqlitePool, id: i64) -> Result<Option<Article>> {
    let sql = format!("{SELECT_ARTICLE} WHERE a.id = ?");
    let row = sqlx::query_as::<_, Article>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn exists(db: &SqlitePool, id: i64) -> Result<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM articles WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(found.is_some())
}

/// Bump the view counter. Retrieval side effect, deliberately not
/// idempotent.
pub async fn increment_view_count(db: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("UPDATE articles SET view_count = view_count + 1 WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

/// Validated fields for an article insert or update
#[derive(Debug, Clone)]
pub struct ArticleFields {
    pub title: String,
    pub content: String,
    pub category_id: i64,
    pub tags: Vec<String>,
    pub image_urls: Vec<String>,
}

/// Insert a new article. The derived rating fields start at their
/// zero defaults and are owned by the aggregator thereafter.
pub async fn insert(db: &SqlitePool, fields: &ArticleFields) -> Result<Article> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO articles (title, content, category_id, tags, image_urls) \
         VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&fields.title)
    .bind(&fields.content)
    .bind(fields.category_id)
    .bind(Json(&fields.tags))
    .bind(Json(&fields.image_urls))
    .fetch_one(db)
    .await?;

    // Refetch with the category join
    let article = find_by_id(db, id).await?;
    article.ok_or_else(|| kb_common::Error::Internal("Inserted article vanished".to_string()))
}

/// Update an article in place. Never touches average_rating,
/// total_ratings, or view_count. Returns None when the id is unknown.
pub async fn update(db: &SqlitePool, id: i64, fields: &ArticleFields) -> Result<Option<Article>> {
    let result = sqlx::query(
        "UPDATE articles SET title = ?, content = ?, category_id = ?, tags = ?, \
         image_urls = ?, updated_at = datetime('now') WHERE id = ?",
    )
    .bind(&fields.title)
    .bind(&fields.content)
    .bind(fields.category_id)
    .bind(Json(&fields.tags))
    .bind(Json(&fields.image_urls))
    .bind(id)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(db, id).await
}

/// Delete an article (ratings cascade). Returns rows deleted.
pub async fn delete(db: &SqlitePool, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM articles WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
