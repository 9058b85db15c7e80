//! Chart of accounts error types.

use ledgerwise_shared::AppError;
use ledgerwise_shared::types::AccountId;
use thiserror::Error;

/// Errors from single-account operations.
///
/// Batch imports never return these; they degrade to warnings.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    /// Another account already uses the code.
    #[error("Account code {0} already exists")]
    DuplicateCode(String),

    /// Type changes are blocked once lines reference the account.
    #[error("Cannot change type of account {0} because it has transactions")]
    TypeChangeNotAllowed(String),

    /// Code or subtype changes are blocked once lines reference the account.
    #[error("Cannot change {field} of account {code} because it has transactions")]
    RestrictedFieldChange {
        /// Account code.
        code: String,
        /// Field that would change.
        field: &'static str,
    },

    /// Accounts with lines cannot be deleted.
    #[error("Cannot delete account {0} because it has transactions; deactivate it instead")]
    HasTransactions(String),

    /// Accounts with children cannot be deleted.
    #[error("Cannot delete account {0} because it has child accounts")]
    HasChildren(String),

    /// Parent code matched no account.
    #[error("Parent account not found: {0}")]
    ParentNotFound(String),

    /// Parent assignment would create a cycle.
    #[error("Setting parent of {0} would create a circular reference")]
    CircularParent(String),

    /// Required field missing.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

impl AccountError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::DuplicateCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::TypeChangeNotAllowed(_) => "ACCOUNT_TYPE_CHANGE_NOT_ALLOWED",
            Self::RestrictedFieldChange { .. } => "RESTRICTED_FIELD_CHANGE",
            Self::HasTransactions(_) => "ACCOUNT_HAS_TRANSACTIONS",
            Self::HasChildren(_) => "ACCOUNT_HAS_CHILDREN",
            Self::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Self::CircularParent(_) => "CIRCULAR_PARENT",
            Self::MissingField(_) => "MISSING_FIELD",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::ParentNotFound(_) => 404,
            Self::DuplicateCode(_) => 409,
            Self::MissingField(_) | Self::CircularParent(_) => 400,
            Self::TypeChangeNotAllowed(_)
            | Self::RestrictedFieldChange { .. }
            | Self::HasTransactions(_)
            | Self::HasChildren(_) => 422,
        }
    }
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err.http_status_code() {
            404 => Self::NotFound(err.to_string()),
            409 => Self::Conflict(err.to_string()),
            422 => Self::BusinessRule(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_status() {
        let err = AccountError::HasTransactions("1000".into());
        assert_eq!(err.error_code(), "ACCOUNT_HAS_TRANSACTIONS");
        assert_eq!(err.http_status_code(), 422);
        assert_eq!(AccountError::DuplicateCode("1".into()).http_status_code(), 409);

        let app: AppError = AccountError::NotFound(AccountId::new()).into();
        assert_eq!(app.status_code(), 404);
    }
}
