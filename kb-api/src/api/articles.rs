//! Article CRUD endpoints
//!
//! Reads are public; create/update/delete require an admin token.
//! The derived rating fields are never writable here.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use kb_common::FieldError;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::AdminAuth;
use crate::db::articles::{ArticleFields, ArticleFilters};
use crate::db;
use crate::error::{ApiError, ApiResult, JsonBody};
use crate::AppState;

/// Default listing size when the client does not specify one
const DEFAULT_LIST_LIMIT: i64 = 20;
const MAX_LIST_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct ListArticlesQuery {
    pub category_id: Option<i64>,
    pub search: Option<String>,
    pub limit: Option<i64>,
}

/// GET /api/articles - List articles with optional filters
pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<ListArticlesQuery>,
) -> ApiResult<Json<Value>> {
    let mut errors = Vec::new();
    if let Some(search) = &query.search {
        let len = search.chars().count();
        if !(1..=100).contains(&len) {
            errors.push(FieldError::new("search", "Search must be 1-100 characters"));
        }
    }
    if let Some(limit) = query.limit {
        if !(1..=MAX_LIST_LIMIT).contains(&limit) {
            errors.push(FieldError::new(
                "limit",
                format!("Limit must be between 1 and {}", MAX_LIST_LIMIT),
            ));
        }
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let filters = ArticleFilters {
        category_id: query.category_id,
        search: query.search,
        limit: query.limit.unwrap_or(DEFAULT_LIST_LIMIT),
    };

    let articles = db::articles::list(&state.db, &filters).await?;

    Ok(Json(json!({
        "success": true,
        "count": articles.len(),
        "data": articles,
    })))
}

/// GET /api/articles/:id - Get single article
///
/// Bumps the view counter as a retrieval side effect; the returned
/// record carries the pre-increment count.
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let article = db::articles::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Article not found".to_string()))?;

    db::articles::increment_view_count(&state.db, id).await?;

    Ok(Json(json!({
        "success": true,
        "data": article,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ArticlePayload {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<i64>,
    pub tags: Option<Vec<String>>,
    pub image_urls: Option<Vec<String>>,
}

async fn validate_payload(state: &AppState, payload: &ArticlePayload) -> ApiResult<ArticleFields> {
    let mut errors = Vec::new();

    let title = payload.title.clone().unwrap_or_default();
    let title_len = title.chars().count();
    if !(5..=255).contains(&title_len) {
        errors.push(FieldError::new("title", "Title must be 5-255 characters"));
    }

    let content = payload.content.clone().unwrap_or_default();
    if content.chars().count() < 20 {
        errors.push(FieldError::new(
            "content",
            "Content must be at least 20 characters",
        ));
    }

    // The bad value is a payload field, so a missing category is a
    // validation error rather than a 404
    let category_id = match payload.category_id {
        Some(id) => {
            if db::categories::find_by_id(&state.db, id).await?.is_none() {
                errors.push(FieldError::new("category_id", "Category does not exist"));
            }
            id
        }
        None => {
            errors.push(FieldError::new("category_id", "Category ID is required"));
            0
        }
    };

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    Ok(ArticleFields {
        title,
        content,
        category_id,
        tags: payload.tags.clone().unwrap_or_default(),
        image_urls: payload.image_urls.clone().unwrap_or_default(),
    })
}

/// POST /api/articles - Create article (admin only)
pub async fn create_article(
    State(state): State<AppState>,
    AdminAuth(_admin): AdminAuth,
    JsonBody(payload): JsonBody<ArticlePayload>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let fields = validate_payload(&state, &payload).await?;
    let article = db::articles::insert(&state.db, &fields).await?;
    info!("Created article {} ({})", article.id, article.title);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": article,
            "message": "Article created successfully",
        })),
    ))
}

/// PUT /api/articles/:id - Update article (admin only)
pub async fn update_article(
    State(state): State<AppState>,
    AdminAuth(_admin): AdminAuth,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<ArticlePayload>,
) -> ApiResult<Json<Value>> {
    let fields = validate_payload(&state, &payload).await?;
    let article = db::articles::update(&state.db, id, &fields)
        .await?
        .ok_or_else(|| ApiError::NotFound("Article not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "data": article,
        "message": "Article updated successfully",
    })))
}

/// DELETE /api/articles/:id - Delete article (admin only)
pub async fn delete_article(
    State(state): State<AppState>,
    AdminAuth(_admin): AdminAuth,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let deleted = db::articles::delete(&state.db, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Article not found".to_string()));
    }
    info!("Deleted article {}", id);

    Ok(Json(json!({
        "success": true,
        "message": "Article deleted successfully",
    })))
}
