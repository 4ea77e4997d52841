//! Database models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Article row, joined with the owning category's name.
///
/// `average_rating` and `total_ratings` are maintained by the rating
/// aggregator; article create/update never writes them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category_id: i64,
    pub category_name: Option<String>,
    pub tags: Json<Vec<String>>,
    pub image_urls: Json<Vec<String>>,
    pub view_count: i64,
    pub average_rating: f64,
    pub total_ratings: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// One submitter's rating of one article.
///
/// The `submitter` field is the raw network-derived identity; public
/// listings must go through the masked view instead of serializing this
/// struct directly.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Rating {
    pub id: i64,
    pub article_id: i64,
    pub submitter: String,
    pub rating: i64,
    pub feedback: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Admin account row. Never serialized: the password hash must not
/// leave the server.
#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}
