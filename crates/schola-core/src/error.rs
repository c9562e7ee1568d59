//! Error types for the schola backend.

use thiserror::Error;

/// Result type alias using schola's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for schola operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Calendar event not found
    #[error("Event not found: {0}")]
    EventNotFound(uuid::Uuid),

    /// Upload job not found
    #[error("Upload job not found: {0}")]
    JobNotFound(uuid::Uuid),

    /// Request failed validation (missing or malformed field)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Caller is authenticated but does not own the resource
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Caller identity is missing or could not be established
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Background worker error
    #[error("Worker error: {0}")]
    Worker(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
