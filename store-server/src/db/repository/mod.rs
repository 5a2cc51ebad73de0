//! Repository Module
//!
//! CRUD operations over the SQLite pool. Repositories are module-level
//! async functions taking `&SqlitePool`.

// Orders
pub mod order;

// System
pub mod notification_log;
pub mod settings;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for shared::AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => shared::AppError::NotFound(msg),
            RepoError::Duplicate(msg) => shared::AppError::Conflict(msg),
            RepoError::Validation(msg) => shared::AppError::Validation(msg),
            RepoError::Database(msg) => shared::AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
