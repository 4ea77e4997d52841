//! Admin user table access

use kb_common::db::models::AdminUser;
use kb_common::Result;
use sqlx::SqlitePool;

pub async fn find_by_username(db: &SqlitePool, username: &str) -> Result<Option<AdminUser>> {
    let row = sqlx::query_as::<_, AdminUser>("SELECT * FROM admin_users WHERE username = ?")
        .bind(username)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn find_by_id(db: &SqlitePool, id: i64) -> Result<Option<AdminUser>> {
    let row = sqlx::query_as::<_, AdminUser>("SELECT * FROM admin_users WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

/// Create an admin account. Used by operator tooling and tests; there is
/// no self-service registration endpoint.
pub async fn insert(
    db: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<AdminUser> {
    let row = sqlx::query_as::<_, AdminUser>(
        "INSERT INTO admin_users (username, email, password_hash) \
         VALUES (?, ?, ?) RETURNING *",
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .fetch_one(db)
    .await?;
    Ok(row)
}
