//! Itemized warnings produced by chart imports.

use serde::{Deserialize, Serialize};

/// What went wrong with a row or account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    /// Code, name, or type missing; row skipped.
    MissingRequiredField,
    /// Type could not be parsed; row skipped.
    InvalidAccountType,
    /// Code repeated in the upload or taken by another account.
    DuplicateCode,
    /// Type change on an account with transactions; rest of update applied.
    TypeChangeBlocked,
    /// Code or subtype change on an account with transactions.
    FieldChangeBlocked,
    /// Strict delete downgraded to deactivate.
    DeleteDowngraded,
    /// Parent code matched no account.
    ParentNotFound,
    /// Account named itself as parent.
    SelfParent,
    /// Parent chain would loop back to the account.
    CircularParent,
}

/// One itemized import warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportWarning {
    /// Source row, when the warning is tied to one.
    pub row: Option<usize>,
    /// Account code involved, if known.
    pub account_code: Option<String>,
    /// Classification.
    pub code: WarningCode,
    /// Human-readable message.
    pub message: String,
}

impl ImportWarning {
    /// Warning tied to a source row.
    pub fn row(row: usize, account_code: Option<&str>, code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            row: Some(row),
            account_code: account_code.map(ToString::to_string),
            code,
            message: message.into(),
        }
    }

    /// Warning about an existing account absent from the upload.
    pub fn account(account_code: &str, code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            row: None,
            account_code: Some(account_code.to_string()),
            code,
            message: message.into(),
        }
    }
}
