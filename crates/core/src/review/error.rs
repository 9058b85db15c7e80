//! Review session error types.

use ledgerwise_shared::AppError;
use thiserror::Error;

use crate::dimension::DimensionError;
use crate::import::ImportError;

/// Errors from review session operations.
///
/// Validation failures are data on the group, never these.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// No group with the key.
    #[error("Entry group not found: {0}")]
    GroupNotFound(String),

    /// No row with the number in the group.
    #[error("Row {row} not found in entry group {key}")]
    RowNotFound {
        /// Group key.
        key: String,
        /// Row number.
        row: usize,
    },

    /// No suggestion with the id in the group.
    #[error("Suggestion {id} not found in entry group {key}")]
    SuggestionNotFound {
        /// Group key.
        key: String,
        /// Suggestion id.
        id: usize,
    },

    /// Suggestion payload is malformed.
    #[error("Invalid suggestion payload: {0}")]
    InvalidSuggestion(String),

    /// Group already committed.
    #[error("Entry group {0} is already committed")]
    AlreadyCommitted(String),

    /// Upload could not be parsed.
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Dimension value could not be approved.
    #[error(transparent)]
    Dimension(#[from] DimensionError),
}

impl ReviewError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::GroupNotFound(_) => "GROUP_NOT_FOUND",
            Self::RowNotFound { .. } => "ROW_NOT_FOUND",
            Self::SuggestionNotFound { .. } => "SUGGESTION_NOT_FOUND",
            Self::InvalidSuggestion(_) => "INVALID_SUGGESTION",
            Self::AlreadyCommitted(_) => "ALREADY_COMMITTED",
            Self::Import(e) => e.error_code(),
            Self::Dimension(e) => e.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::GroupNotFound(_) | Self::RowNotFound { .. } | Self::SuggestionNotFound { .. } => 404,
            Self::InvalidSuggestion(_) => 400,
            Self::AlreadyCommitted(_) => 409,
            Self::Import(e) => e.http_status_code(),
            Self::Dimension(e) => e.http_status_code(),
        }
    }
}

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match err.http_status_code() {
            404 => Self::NotFound(err.to_string()),
            409 => Self::Conflict(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
