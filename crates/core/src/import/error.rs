//! Import error types.

use ledgerwise_shared::AppError;
use thiserror::Error;

/// Errors that abort parsing of an uploaded file.
#[derive(Debug, Error)]
pub enum ImportError {
    /// File extension is not a supported delimited-text format.
    #[error("Unsupported import format: {0}")]
    UnsupportedFormat(String),

    /// File is empty.
    #[error("Import file is empty")]
    EmptyFile,

    /// Header row is missing or blank.
    #[error("Import file has no header row")]
    MissingHeader,

    /// File is not valid UTF-8.
    #[error("Import file is not valid UTF-8")]
    InvalidEncoding,

    /// Underlying reader failed.
    #[error("Failed to parse import file: {0}")]
    Parse(#[from] csv::Error),
}

impl ImportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::EmptyFile => "EMPTY_FILE",
            Self::MissingHeader => "MISSING_HEADER",
            Self::InvalidEncoding => "INVALID_ENCODING",
            Self::Parse(_) => "PARSE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::UnsupportedFormat(_) => 415,
            Self::EmptyFile | Self::MissingHeader | Self::InvalidEncoding | Self::Parse(_) => 400,
        }
    }
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        Self::Validation(err.to_string())
    }
}
