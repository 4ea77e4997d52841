//! Database access layer
//!
//! Pool initialization, schema creation, and typed row models shared by
//! all consumers of the knowledge base database.

pub mod init;
pub mod models;

pub use init::{connect_memory, init_database};
