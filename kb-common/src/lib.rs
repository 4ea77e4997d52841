//! # Knowledge Base Common Library
//!
//! Shared code for the knowledge base backend:
//! - Error taxonomy
//! - Database initialization and schema
//! - Typed row models

pub mod db;
pub mod error;

pub use error::{Error, FieldError, Result};
