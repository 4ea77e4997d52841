//! Admin session tokens and credential verification
//!
//! Signed-token scheme: HS256 JWTs carrying the admin's id and username,
//! verified on each protected request. Passwords are stored as argon2
//! hashes. Protected handlers take the `AdminAuth` extractor, which
//! validates the Bearer token and confirms the user still exists.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use kb_common::db::models::AdminUser;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::db;
use crate::error::ApiError;
use crate::AppState;

/// Token lifetime
pub const TOKEN_TTL_DAYS: i64 = 7;

/// JWT claims for an admin session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin user id
    pub sub: i64,
    pub username: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
}

/// Issue a signed session token for an admin user
pub fn issue_token(secret: &str, user: &AdminUser) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("Failed to sign token: {}", e)))
}

/// Decode and validate a session token (signature + expiry)
pub fn decode_token(secret: &str, token: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::Unauthorized("Invalid token".to_string()))
}

/// Hash a password for storage
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its stored hash. An unparseable hash
/// verifies as false rather than erroring.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Authenticated admin, extracted from the Authorization header.
///
/// Custom-extractor pattern: protected handlers simply take this as an
/// argument, so public and admin methods can share a route.
#[derive(Debug, Clone)]
pub struct AdminAuth(pub AdminUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            ApiError::Unauthorized("Access denied. No token provided.".to_string())
        })?;

        let claims = decode_token(&state.jwt_secret, token)?;

        // Verify the user still exists; a deleted admin's outstanding
        // tokens must stop working
        let user = db::admin_users::find_by_id(&state.db, claims.sub)
            .await?
            .ok_or_else(|| {
                warn!("Token references missing admin user {}", claims.sub);
                ApiError::Unauthorized("Invalid token".to_string())
            })?;

        Ok(AdminAuth(user))
    }
}

/// Extract the Bearer token from the Authorization header
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn test_user() -> AdminUser {
        AdminUser {
            id: 7,
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: String::new(),
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let token = issue_token("test-secret", &test_user()).unwrap();
        let claims = decode_token("test-secret", &token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token("test-secret", &test_user()).unwrap();
        assert!(decode_token("other-secret", &token).is_err());
    }

    #[test]
    fn test_password_verification() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
        assert!(!verify_password("correct horse", "not-a-hash"));
    }
}
