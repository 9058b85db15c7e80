//! Attachment error types.

use ledgerwise_shared::AppError;
use ledgerwise_shared::types::{AttachmentId, JournalEntryId};
use thiserror::Error;

use crate::storage::StorageError;

/// Attachment operation errors.
#[derive(Debug, Error)]
pub enum AttachmentError {
    /// Attachment not found.
    #[error("attachment not found: {0}")]
    NotFound(AttachmentId),

    /// Journal entry not found.
    #[error("journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),

    /// Empty upload.
    #[error("file is empty")]
    EmptyFile,

    /// Invalid MIME type.
    #[error("invalid MIME type: {0}")]
    InvalidMimeType(String),

    /// File too large.
    #[error("file too large: {size} bytes exceeds maximum {max} bytes")]
    FileTooLarge {
        /// Actual file size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl AttachmentError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "ATTACHMENT_NOT_FOUND",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::EmptyFile => "EMPTY_FILE",
            Self::InvalidMimeType(_) => "INVALID_MIME_TYPE",
            Self::FileTooLarge { .. } => "FILE_TOO_LARGE",
            Self::Storage(e) => e.error_code(),
            Self::Repository(_) => "REPOSITORY_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::EntryNotFound(_) => 404,
            Self::EmptyFile => 400,
            Self::InvalidMimeType(_) => 415,
            Self::FileTooLarge { .. } => 413,
            Self::Storage(e) => e.http_status_code(),
            Self::Repository(_) => 500,
        }
    }
}

impl From<AttachmentError> for AppError {
    fn from(err: AttachmentError) -> Self {
        let message = err.to_string();
        match (&err, err.http_status_code()) {
            (_, 404) => Self::NotFound(message),
            (AttachmentError::Storage(_), 500) => Self::Storage(message),
            (_, 500) => Self::Internal(message),
            _ => Self::Validation(message),
        }
    }
}
