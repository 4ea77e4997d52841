//! Rating table access
//!
//! Uniqueness of (article_id, submitter) is enforced by the store's
//! composite unique constraint; submissions go through an ON CONFLICT
//! upsert so a duplicate-key race merges instead of erroring.

use kb_common::db::models::Rating;
use kb_common::Result;
use sqlx::SqlitePool;

/// Insert a rating, or overwrite the existing row for this
/// (article, submitter) pair. Resubmission replaces score, feedback,
/// and timestamp; it never creates a second row.
pub async fn upsert(
    db: &SqlitePool,
    article_id: i64,
    submitter: &str,
    rating: i64,
    feedback: Option<&str>,
) -> Result<Rating> {
    let row = sqlx::query_as::<_, Rating>(
        r#"
        INSERT INTO ratings (article_id, submitter, rating, feedback)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (article_id, submitter) DO UPDATE SET
            rating = excluded.rating,
            feedback = excluded.feedback,
            created_at = datetime('now')
        RETURNING *
        "#,
    )
    .bind(article_id)
    .bind(submitter)
    .bind(rating)
    .bind(feedback)
    .fetch_one(db)
    .await?;
    Ok(row)
}

/// One page of ratings for an article, newest first (id breaks
/// same-second ties)
pub async fn list_page(
    db: &SqlitePool,
    article_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<Rating>> {
    let rows = sqlx::query_as::<_, Rating>(
        "SELECT * FROM ratings WHERE article_id = ? \
         ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
    )
    .bind(article_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Total rating count for an article, independent of pagination
pub async fn count_for_article(db: &SqlitePool, article_id: i64) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ratings WHERE article_id = ?")
        .bind(article_id)
        .fetch_one(db)
        .await?;
    Ok(count)
}

/// Per-score counts for an article (only scores that occur)
pub async fn distribution(db: &SqlitePool, article_id: i64) -> Result<Vec<(i64, i64)>> {
    let rows = sqlx::query_as::<_, (i64, i64)>(
        "SELECT rating, COUNT(*) FROM ratings WHERE article_id = ? \
         GROUP BY rating ORDER BY rating DESC",
    )
    .bind(article_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// One identity's rating of one article, if any
pub async fn find_by_submitter(
    db: &SqlitePool,
    article_id: i64,
    submitter: &str,
) -> Result<Option<Rating>> {
    let row = sqlx::query_as::<_, Rating>(
        "SELECT * FROM ratings WHERE article_id = ? AND submitter = ?",
    )
    .bind(article_id)
    .bind(submitter)
    .fetch_optional(db)
    .await?;
    Ok(row)
}
