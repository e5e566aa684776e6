//! Error types for Depot.

use thiserror::Error;

/// Common error type for Depot.
#[derive(Error, Debug)]
pub enum DepotError {
    /// A user-supplied path escapes the repository root or is malformed.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Rename/move destination is already occupied.
    #[error("{0} already exists")]
    AlreadyExists(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database error.
    ///
    /// This is a generic database error that wraps errors from the
    /// metadata index. Errors from sqlx are automatically converted.
    #[error("database error: {0}")]
    Database(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from sqlx errors
impl From<sqlx::Error> for DepotError {
    fn from(e: sqlx::Error) -> Self {
        DepotError::Database(e.to_string())
    }
}

/// Result type alias for Depot operations.
pub type Result<T> = std::result::Result<T, DepotError>;
