//! Storage error types.
//!
//! Used by every backend; callers map them into `BotError::Database`.

use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Unsupported database URL: {0}")]
    UnsupportedUrl(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}

impl From<mongodb::error::Error> for StorageError {
    fn from(e: mongodb::error::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for StorageError {
    fn from(e: mongodb::bson::ser::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}
