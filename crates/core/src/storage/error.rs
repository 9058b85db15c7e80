//! Storage error types.

use ledgerwise_shared::AppError;
use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Object not found in storage.
    #[error("file not found: {key}")]
    NotFound {
        /// Storage key that was not found.
        key: String,
    },

    /// Storage provider configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// OpenDAL operation error.
    #[error("storage operation failed: {0}")]
    Operation(String),

    /// Invalid storage key format.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

impl StorageError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "STORAGE_NOT_FOUND",
            Self::Configuration(_) => "STORAGE_CONFIGURATION",
            Self::Operation(_) => "STORAGE_OPERATION_FAILED",
            Self::InvalidKey(_) => "INVALID_STORAGE_KEY",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::InvalidKey(_) => 400,
            Self::Configuration(_) | Self::Operation(_) => 500,
        }
    }

    /// Maps an OpenDAL error on `key`.
    pub(crate) fn from_opendal(key: &str, err: &opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::not_found(key),
            _ => Self::Operation(err.to_string()),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err.http_status_code() {
            404 => Self::NotFound(err.to_string()),
            400 => Self::Validation(err.to_string()),
            _ => Self::Storage(err.to_string()),
        }
    }
}
