//! HTTP-facing error type for kb-api
//!
//! Every failure surfaces as structured JSON: `{"success": false,
//! "message": ...}` plus an `errors` array for validation failures.
//! Internal details are logged, never sent to the client.

use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kb_common::{Error as CoreError, FieldError};
use serde_json::json;
use sqlx::error::ErrorKind;
use tracing::error;

/// Convenience Result type for HTTP handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Handler-level error, mapped to an HTTP status and JSON envelope
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or out-of-range input (400)
    Validation(Vec<FieldError>),
    /// Missing or invalid credentials (401)
    Unauthorized(String),
    /// Referenced entity absent (404)
    NotFound(String),
    /// Uniqueness or referential constraint violated (409)
    Conflict(String),
    /// Submission quota exceeded (429)
    RateLimited(String),
    /// Unexpected persistence or server failure (500)
    Internal(String),
}

impl ApiError {
    /// Build a validation error for a single field
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Validation(vec![FieldError::new(field, message)])
    }
}

/// JSON request body extractor.
///
/// Wraps `axum::Json` so that malformed payloads (bad syntax, wrong
/// content type, type mismatches) are reported through the same JSON
/// envelope as every other error instead of axum's plain-text rejection.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = axum::Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::field("body", rejection.body_text())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        // Constraint violations carry domain meaning; everything else is
        // an upstream failure
        if let Some(db_err) = e.as_database_error() {
            match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    return ApiError::Conflict("Resource already exists".to_string());
                }
                ErrorKind::ForeignKeyViolation => {
                    return ApiError::Conflict(
                        "Operation violates a referential constraint".to_string(),
                    );
                }
                _ => {}
            }
        }
        ApiError::Internal(e.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Database(db) => ApiError::from(db),
            CoreError::Validation(errors) => ApiError::Validation(errors),
            CoreError::NotFound(msg) => ApiError::NotFound(msg),
            CoreError::Conflict(msg) => ApiError::Conflict(msg),
            CoreError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            CoreError::RateLimited(msg) => ApiError::RateLimited(msg),
            CoreError::Io(io) => ApiError::Internal(io.to_string()),
            CoreError::Config(msg) | CoreError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::RateLimited(msg) => (StatusCode::TOO_MANY_REQUESTS, msg, None),
            ApiError::Internal(detail) => {
                error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "success": false,
            "message": message,
        });
        if let Some(errors) = errors {
            body["errors"] = json!(errors);
        }

        (status, Json(body)).into_response()
    }
}
