//! Dimension error types.

use ledgerwise_shared::AppError;
use ledgerwise_shared::types::DimensionId;
use thiserror::Error;

/// Errors from dimension catalog operations.
#[derive(Debug, Error)]
pub enum DimensionError {
    /// Dimension not found.
    #[error("Dimension not found: {0}")]
    DimensionNotFound(DimensionId),

    /// Dimension is inactive.
    #[error("Dimension {0} is inactive")]
    DimensionInactive(DimensionId),

    /// Value name is blank.
    #[error("Dimension value name cannot be empty")]
    EmptyValueName,
}

impl DimensionError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DimensionNotFound(_) => "DIMENSION_NOT_FOUND",
            Self::DimensionInactive(_) => "DIMENSION_INACTIVE",
            Self::EmptyValueName => "EMPTY_VALUE_NAME",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::DimensionNotFound(_) => 404,
            Self::DimensionInactive(_) | Self::EmptyValueName => 400,
        }
    }
}

impl From<DimensionError> for AppError {
    fn from(err: DimensionError) -> Self {
        match err {
            DimensionError::DimensionNotFound(_) => Self::NotFound(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
