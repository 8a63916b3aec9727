//! Core Error Types
//!
//! Defines the error types produced by the freshness engine and by the
//! external source traits. The root crate wraps these in its own `AppError`
//! together with storage-specific variants.

use thiserror::Error;

/// Core error type for the Heatwave workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A wavelength that is zero or negative
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    /// A contact has no phone number where one is required
    #[error("No contact info: {0}")]
    NoContactInfo(String),

    /// An external directory or history source could not be read
    #[error("External source unavailable: {0}")]
    SourceUnavailable(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create an invalid interval error
    pub fn invalid_interval(msg: impl Into<String>) -> Self {
        Self::InvalidInterval(msg.into())
    }

    /// Create a no contact info error
    pub fn no_contact_info(msg: impl Into<String>) -> Self {
        Self::NoContactInfo(msg.into())
    }

    /// Create a source unavailable error
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable(msg.into())
    }
}

/// Convert CoreError to a string
impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
