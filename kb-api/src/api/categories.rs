//! Category CRUD endpoints
//!
//! Reads are public; create/update/delete require an admin token.
//! Name uniqueness is case-insensitive: the store enforces it with a
//! NOCASE unique column, and handlers pre-check to return a friendly
//! conflict message.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kb_common::FieldError;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::AdminAuth;
use crate::db;
use crate::error::{ApiError, ApiResult, JsonBody};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Validated category fields
struct CategoryFields {
    name: String,
    description: Option<String>,
}

fn validate_payload(payload: &CategoryPayload) -> ApiResult<CategoryFields> {
    let mut errors = Vec::new();

    let name = payload.name.clone().unwrap_or_default();
    let name = name.trim().to_string();
    let len = name.chars().count();
    if !(2..=100).contains(&len) {
        errors.push(FieldError::new("name", "Name must be 2-100 characters"));
    }

    if let Some(description) = &payload.description {
        if description.chars().count() > 500 {
            errors.push(FieldError::new(
                "description",
                "Description must be at most 500 characters",
            ));
        }
    }

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    Ok(CategoryFields {
        name,
        description: payload.description.clone(),
    })
}

/// GET /api/categories - List all categories
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let categories = db::categories::list(&state.db).await?;
    Ok(Json(json!({
        "success": true,
        "data": categories,
    })))
}

/// GET /api/categories/:id - Get single category
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let category = db::categories::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "data": category,
    })))
}

/// POST /api/categories - Create category (admin only)
pub async fn create_category(
    State(state): State<AppState>,
    AdminAuth(_admin): AdminAuth,
    JsonBody(payload): JsonBody<CategoryPayload>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let fields = validate_payload(&payload)?;

    if db::categories::find_by_name_ci(&state.db, &fields.name, None)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "Category name already exists".to_string(),
        ));
    }

    let category =
        db::categories::insert(&state.db, &fields.name, fields.description.as_deref()).await?;
    info!("Created category {} ({})", category.id, category.name);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": category,
            "message": "Category created successfully",
        })),
    ))
}

/// PUT /api/categories/:id - Update category (admin only)
pub async fn update_category(
    State(state): State<AppState>,
    AdminAuth(_admin): AdminAuth,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<CategoryPayload>,
) -> ApiResult<Json<Value>> {
    let fields = validate_payload(&payload)?;

    if db::categories::find_by_name_ci(&state.db, &fields.name, Some(id))
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "Category name already exists".to_string(),
        ));
    }

    let category =
        db::categories::update(&state.db, id, &fields.name, fields.description.as_deref())
            .await?
            .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "data": category,
        "message": "Category updated successfully",
    })))
}

/// DELETE /api/categories/:id - Delete category (admin only)
///
/// Rejected with a conflict while articles still reference the
/// category; the FK constraint is the backstop for races.
pub async fn delete_category(
    State(state): State<AppState>,
    AdminAuth(_admin): AdminAuth,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    if db::categories::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("Category not found".to_string()));
    }

    let referencing = db::categories::article_count(&state.db, id).await?;
    if referencing > 0 {
        return Err(ApiError::Conflict(format!(
            "Cannot delete category: {} article(s) still reference it",
            referencing
        )));
    }

    db::categories::delete(&state.db, id).await?;
    info!("Deleted category {}", id);

    Ok(Json(json!({
        "success": true,
        "message": "Category deleted successfully",
    })))
}
