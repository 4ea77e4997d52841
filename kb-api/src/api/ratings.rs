//! Rating subsystem endpoints
//!
//! Submission enforces the per-identity quota, validates the score,
//! upserts against the composite unique constraint, then refreshes the
//! article's derived aggregates best-effort. Listings mask the
//! submitter identity and attach the score distribution.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDateTime;
use kb_common::db::models::Rating;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::db;
use crate::error::{ApiError, ApiResult, JsonBody};
use crate::identity::{mask_identity, ClientIdentity};
use crate::{aggregate, pagination, AppState};

/// Upper bound on free-text feedback length
const MAX_FEEDBACK_CHARS: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct SubmitRatingRequest {
    pub rating: Option<i64>,
    pub feedback: Option<String>,
}

/// Rating record with the submitter identity redacted for public display
#[derive(Debug, Serialize)]
pub struct MaskedRating {
    pub id: i64,
    pub rating: i64,
    pub feedback: Option<String>,
    pub created_at: NaiveDateTime,
    pub masked_ip: String,
}

impl From<&Rating> for MaskedRating {
    fn from(rating: &Rating) -> Self {
        Self {
            id: rating.id,
            rating: rating.rating,
            feedback: rating.feedback.clone(),
            created_at: rating.created_at,
            masked_ip: mask_identity(&rating.submitter),
        }
    }
}

/// POST /api/articles/:id/rating - Submit or overwrite a rating
pub async fn submit_rating(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
    identity: ClientIdentity,
    JsonBody(body): JsonBody<SubmitRatingRequest>,
) -> ApiResult<Json<Value>> {
    // Quota first: throttled requests must not mutate any state
    if !state.limiter.check(identity.as_str()) {
        return Err(ApiError::RateLimited(
            "Too many rating attempts, please try again later".to_string(),
        ));
    }

    let rating = match body.rating {
        Some(r) if (1..=5).contains(&r) => r,
        _ => return Err(ApiError::field("rating", "Rating must be between 1 and 5")),
    };

    if let Some(feedback) = &body.feedback {
        if feedback.chars().count() > MAX_FEEDBACK_CHARS {
            return Err(ApiError::field(
                "feedback",
                format!("Feedback must be at most {} characters", MAX_FEEDBACK_CHARS),
            ));
        }
    }

    if !db::articles::exists(&state.db, article_id).await? {
        return Err(ApiError::NotFound("Article not found".to_string()));
    }

    let saved = db::ratings::upsert(
        &state.db,
        article_id,
        identity.as_str(),
        rating,
        body.feedback.as_deref(),
    )
    .await?;

    // The rating write has succeeded; a failed recompute is logged, not
    // surfaced (the cached aggregate may lag until the next refresh)
    aggregate::refresh_best_effort(&state.db, article_id).await;

    Ok(Json(json!({
        "success": true,
        "message": "Rating submitted successfully",
        "data": saved,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ListRatingsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/articles/:id/ratings - Paginated masked ratings with score
/// distribution
pub async fn list_ratings(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
    Query(query): Query<ListRatingsQuery>,
) -> ApiResult<Json<Value>> {
    let params = pagination::resolve(query.page, query.limit);

    let total = db::ratings::count_for_article(&state.db, article_id).await?;
    let rows = db::ratings::list_page(&state.db, article_id, params.limit, params.offset).await?;
    let ratings: Vec<MaskedRating> = rows.iter().map(MaskedRating::from).collect();

    // Zero-fill the 1-5 buckets, descending by score
    let counts = db::ratings::distribution(&state.db, article_id).await?;
    let distribution: Vec<Value> = (1..=5)
        .rev()
        .map(|score| {
            let count = counts
                .iter()
                .find(|(rating, _)| *rating == score)
                .map(|(_, count)| *count)
                .unwrap_or(0);
            json!({ "rating": score, "count": count })
        })
        .collect();

    Ok(Json(json!({
        "success": true,
        "data": {
            "ratings": ratings,
            "total": total,
            "distribution": distribution,
            "pagination": {
                "page": params.page,
                "limit": params.limit,
                "totalPages": pagination::total_pages(total, params.limit),
            },
        },
    })))
}

/// GET /api/articles/:id/user-rating - The caller's own rating, or null.
/// Absence is a valid answer, not an error.
pub async fn user_rating(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
    identity: ClientIdentity,
) -> ApiResult<Json<Value>> {
    let existing =
        db::ratings::find_by_submitter(&state.db, article_id, identity.as_str()).await?;

    let data = match existing {
        Some(rating) => json!({ "rating": rating.rating, "feedback": rating.feedback }),
        None => Value::Null,
    };

    Ok(Json(json!({
        "success": true,
        "data": data,
    })))
}
