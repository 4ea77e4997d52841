//! Admin authentication endpoints

use axum::extract::State;
use axum::Json;
use kb_common::FieldError;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::auth::{self, AdminAuth};
use crate::db;
use crate::error::{ApiError, ApiResult, JsonBody};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/login - Exchange admin credentials for a session token
///
/// Unknown usernames and wrong passwords get the same response, so the
/// endpoint does not confirm which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> ApiResult<Json<Value>> {
    let mut errors = Vec::new();
    let username = body.username.unwrap_or_default();
    let password = body.password.unwrap_or_default();
    if username.chars().count() < 3 {
        errors.push(FieldError::new(
            "username",
            "Username must be at least 3 characters",
        ));
    }
    if password.chars().count() < 6 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters",
        ));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let user = db::admin_users::find_by_username(&state.db, &username).await?;
    let Some(user) = user else {
        warn!("Login attempt for unknown admin user");
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    };

    if !auth::verify_password(&password, &user.password_hash) {
        warn!("Failed login for admin user {}", user.username);
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = auth::issue_token(&state.jwt_secret, &user)?;
    info!("Admin user {} logged in", user.username);

    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "data": {
            "token": token,
            "user": {
                "id": user.id,
                "username": user.username,
                "email": user.email,
            },
        },
    })))
}

/// POST /api/auth/logout - Acknowledge a logout.
///
/// Tokens are self-contained and expire on their own; the server holds
/// no session state to invalidate, so the client just discards its copy.
pub async fn logout() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Logged out successfully",
    }))
}

/// POST /api/auth/verify - Validate the caller's token and return fresh
/// user data. The extractor does all the work.
pub async fn verify(AdminAuth(user): AdminAuth) -> ApiResult<Json<Value>> {
    Ok(Json(json!({
        "success": true,
        "data": {
            "user": {
                "id": user.id,
                "username": user.username,
                "email": user.email,
            },
        },
    })))
}
