//! Per-table query modules
//!
//! Thin async functions over the sqlx pool; all SQL for a table lives in
//! its module. Handlers never build SQL themselves.

pub mod admin_users;
pub mod articles;
pub mod categories;
pub mod ratings;
