pub mod connection;
pub mod models;
pub mod service;
pub mod store;

use thiserror::Error;

pub use connection::{ensure_schema, get_connection, DbPool};
pub use models::*;
pub use store::DbStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),
    #[error("Database Error: {0}")]
    Database(#[from] duckdb::Error),
    #[error("Database connection lock poisoned")]
    Poisoned,
}
