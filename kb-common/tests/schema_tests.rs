//! Store-level constraint tests
//!
//! The schema, not application code, is the authoritative enforcement
//! point for rating uniqueness, category name uniqueness, and
//! referential integrity. These tests pin that behavior down.

use kb_common::db::connect_memory;
use sqlx::SqlitePool;

async fn seed_article(pool: &SqlitePool) -> i64 {
    let category_id: i64 =
        sqlx::query_scalar("INSERT INTO categories (name) VALUES ('Network') RETURNING id")
            .fetch_one(pool)
            .await
            .unwrap();

    sqlx::query_scalar(
        "INSERT INTO articles (title, content, category_id) \
         VALUES ('Router keeps rebooting', 'Check the power supply first.', ?) RETURNING id",
    )
    .bind(category_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_foreign_key_violation())
        .unwrap_or(false)
}

#[tokio::test]
async fn test_duplicate_rating_rejected_by_composite_constraint() {
    let pool = connect_memory().await.unwrap();
    let article_id = seed_article(&pool).await;

    sqlx::query("INSERT INTO ratings (article_id, submitter, rating) VALUES (?, '203.0.113.9', 4)")
        .bind(article_id)
        .execute(&pool)
        .await
        .unwrap();

    let err = sqlx::query(
        "INSERT INTO ratings (article_id, submitter, rating) VALUES (?, '203.0.113.9', 5)",
    )
    .bind(article_id)
    .execute(&pool)
    .await
    .unwrap_err();

    assert!(is_unique_violation(&err));
}

#[tokio::test]
async fn test_same_submitter_may_rate_different_articles() {
    let pool = connect_memory().await.unwrap();
    let first = seed_article(&pool).await;
    let second: i64 = sqlx::query_scalar(
        "INSERT INTO articles (title, content, category_id) \
         SELECT 'DNS resolution fails', 'Flush the resolver cache.', category_id \
         FROM articles WHERE id = ? RETURNING id",
    )
    .bind(first)
    .fetch_one(&pool)
    .await
    .unwrap();

    for article_id in [first, second] {
        sqlx::query(
            "INSERT INTO ratings (article_id, submitter, rating) VALUES (?, '203.0.113.9', 4)",
        )
        .bind(article_id)
        .execute(&pool)
        .await
        .unwrap();
    }
}

#[tokio::test]
async fn test_category_name_unique_case_insensitive() {
    let pool = connect_memory().await.unwrap();

    sqlx::query("INSERT INTO categories (name) VALUES ('Network')")
        .execute(&pool)
        .await
        .unwrap();

    let err = sqlx::query("INSERT INTO categories (name) VALUES ('network')")
        .execute(&pool)
        .await
        .unwrap_err();

    assert!(is_unique_violation(&err));
}

#[tokio::test]
async fn test_category_delete_restricted_while_referenced() {
    let pool = connect_memory().await.unwrap();
    let article_id = seed_article(&pool).await;

    let err = sqlx::query("DELETE FROM categories WHERE name = 'Network'")
        .execute(&pool)
        .await
        .unwrap_err();
    assert!(is_foreign_key_violation(&err));

    // Once the article is gone the category can be deleted
    sqlx::query("DELETE FROM articles WHERE id = ?")
        .bind(article_id)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("DELETE FROM categories WHERE name = 'Network'")
        .execute(&pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_ratings_cascade_on_article_delete() {
    let pool = connect_memory().await.unwrap();
    let article_id = seed_article(&pool).await;

    sqlx::query("INSERT INTO ratings (article_id, submitter, rating) VALUES (?, '203.0.113.9', 4)")
        .bind(article_id)
        .execute(&pool)
        .await
        .unwrap();

    sqlx::query("DELETE FROM articles WHERE id = ?")
        .bind(article_id)
        .execute(&pool)
        .await
        .unwrap();

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ratings")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn test_rating_range_check_constraint() {
    let pool = connect_memory().await.unwrap();
    let article_id = seed_article(&pool).await;

    for bad_score in [0_i64, 6] {
        let result = sqlx::query(
            "INSERT INTO ratings (article_id, submitter, rating) VALUES (?, '203.0.113.9', ?)",
        )
        .bind(article_id)
        .bind(bad_score)
        .execute(&pool)
        .await;
        assert!(result.is_err(), "score {} must violate CHECK", bad_score);
    }
}

#[tokio::test]
async fn test_schema_creation_idempotent() {
    let pool = connect_memory().await.unwrap();
    // Second application of the schema must be a no-op
    kb_common::db::init::create_schema(&pool).await.unwrap();
}
