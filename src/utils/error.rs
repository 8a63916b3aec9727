//! Error Handling
//!
//! Unified error types for the application.
//! Uses thiserror for ergonomic error definitions.

use heatwave_core::CoreError;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(String),

    /// SQLite errors (auto-converted from rusqlite::Error)
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The delete-wave cascade could not be applied atomically
    #[error("Transaction failed: {0}")]
    TransactionFailure(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Engine and external source errors (invalid interval, no contact info,
    /// source unavailable)
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a transaction failure
    pub fn transaction(msg: impl Into<String>) -> Self {
        Self::TransactionFailure(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True when an external directory or history source failed
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, Self::Core(CoreError::SourceUnavailable(_)))
    }

    /// True when a required phone number was missing
    pub fn is_no_contact_info(&self) -> bool {
        matches!(self, Self::Core(CoreError::NoContactInfo(_)))
    }

    /// True when a wavelength was rejected
    pub fn is_invalid_interval(&self) -> bool {
        matches!(self, Self::Core(CoreError::InvalidInterval(_)))
    }
}

/// Convert AppError to a string for display at the CLI boundary
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
