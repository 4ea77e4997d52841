//! kb-api library - Knowledge base HTTP service
//!
//! Exposes the router and shared state so integration tests can drive
//! the full API surface without binding a socket.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod aggregate;
pub mod api;
pub mod auth;
pub mod db;
pub mod error;
pub mod identity;
pub mod limiter;
pub mod pagination;

use limiter::SubmissionLimiter;

/// Application state shared across HTTP handlers
///
/// Constructed once in `main` and dependency-injected; there is no
/// ambient global state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Secret used to sign and verify admin session tokens
    pub jwt_secret: Arc<String>,
    /// Per-identity rating submission quota
    pub limiter: Arc<SubmissionLimiter>,
}

impl AppState {
    /// Create application state with the default submission quota
    pub fn new(db: SqlitePool, jwt_secret: impl Into<String>) -> Self {
        Self::with_limiter(db, jwt_secret, SubmissionLimiter::default())
    }

    /// Create application state with an explicit submission limiter
    /// (tests use a small quota to exercise throttling quickly)
    pub fn with_limiter(
        db: SqlitePool,
        jwt_secret: impl Into<String>,
        limiter: SubmissionLimiter,
    ) -> Self {
        Self {
            db,
            jwt_secret: Arc::new(jwt_secret.into()),
            limiter: Arc::new(limiter),
        }
    }
}

/// Build application router
///
/// Admin-only handlers authenticate via the `AdminAuth` extractor rather
/// than a route-level middleware layer, so public and protected methods
/// can share a path.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check (no auth)
        .route("/api/health", get(api::health::health))
        // Admin session management
        .route("/api/auth/login", post(api::auth::login))
        .route("/api/auth/logout", post(api::auth::logout))
        .route("/api/auth/verify", post(api::auth::verify))
        // Article browsing and admin CRUD
        .route(
            "/api/articles",
            get(api::articles::list_articles).post(api::articles::create_article),
        )
        .route(
            "/api/articles/:id",
            get(api::articles::get_article)
                .put(api::articles::update_article)
                .delete(api::articles::delete_article),
        )
        // Rating subsystem
        .route("/api/articles/:id/rating", post(api::ratings::submit_rating))
        .route("/api/articles/:id/ratings", get(api::ratings::list_ratings))
        .route("/api/articles/:id/user-rating", get(api::ratings::user_rating))
        // Category browsing and admin CRUD
        .route(
            "/api/categories",
            get(api::categories::list_categories).post(api::categories::create_category),
        )
        .route(
            "/api/categories/:id",
            get(api::categories::get_category)
                .put(api::categories::update_category)
                .delete(api::categories::delete_category),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Enable CORS for the browser frontend
        .layer(CorsLayer::permissive())
}
