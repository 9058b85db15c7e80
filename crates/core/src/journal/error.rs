//! Journal error types for balance and lifecycle failures.

use chrono::NaiveDate;
use ledgerwise_shared::AppError;
use ledgerwise_shared::types::{AccountId, JournalEntryId};
use rust_decimal::Decimal;
use thiserror::Error;

use super::entry::EntryStatus;

/// Errors that can occur while building, posting, or reversing entries.
#[derive(Debug, Error)]
pub enum JournalError {
    // ========== Validation Errors ==========
    /// Journal entry has no lines.
    #[error("Journal entry must have at least one line")]
    EmptyEntry,

    /// Total debits do not equal total credits.
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// The entry balances overall but one or more entities do not.
    #[error("Intercompany entry is not balanced for entities: {}", entities.join(", "))]
    IntercompanyImbalance {
        /// Entity codes whose lines do not balance on their own.
        entities: Vec<String>,
    },

    /// A line carries both a debit and a credit.
    #[error("Line must specify either debit or credit, not both (debit {debit}, credit {credit})")]
    LineHasBothSides {
        /// Debit side.
        debit: Decimal,
        /// Credit side.
        credit: Decimal,
    },

    /// Account could not be resolved.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Account is inactive and cannot be posted to.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    // ========== Lifecycle Errors ==========
    /// Transition not allowed from the current status.
    #[error("Cannot move journal entry from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: EntryStatus,
        /// Requested status.
        to: EntryStatus,
    },

    /// Posted entries are immutable.
    #[error("Cannot modify posted journal entry")]
    CannotModifyPosted,

    /// Void entries are immutable.
    #[error("Cannot modify void journal entry")]
    CannotModifyVoid,

    /// Only drafts may be deleted.
    #[error("Can only delete draft journal entries")]
    CanOnlyDeleteDraft,

    /// Actor lacks the role required for the action.
    #[error("Role {role} cannot {action}")]
    InsufficientPrivileges {
        /// Actor role.
        role: String,
        /// Attempted action.
        action: &'static str,
    },

    /// Rejection needs a reason.
    #[error("Rejection reason is required")]
    RejectionReasonRequired,

    /// Only posted entries can be reversed.
    #[error("Only posted journal entries can be reversed (status: {0})")]
    ReversalRequiresPosted(EntryStatus),

    /// Reversal date precedes the original entry date.
    #[error("Reversal date {reversal} is before entry date {entry}")]
    ReversalDateBeforeEntry {
        /// Original entry date.
        entry: NaiveDate,
        /// Requested reversal date.
        reversal: NaiveDate,
    },

    /// Accrual entry posted without a reversal date.
    #[error("Accrual entry requires a reversal date")]
    AccrualWithoutReversalDate,

    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),
}

impl JournalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyEntry => "EMPTY_ENTRY",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::IntercompanyImbalance { .. } => "INTERCOMPANY_IMBALANCE",
            Self::LineHasBothSides { .. } => "LINE_HAS_BOTH_SIDES",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::CannotModifyPosted => "CANNOT_MODIFY_POSTED",
            Self::CannotModifyVoid => "CANNOT_MODIFY_VOID",
            Self::CanOnlyDeleteDraft => "CAN_ONLY_DELETE_DRAFT",
            Self::InsufficientPrivileges { .. } => "INSUFFICIENT_PRIVILEGES",
            Self::RejectionReasonRequired => "REJECTION_REASON_REQUIRED",
            Self::ReversalRequiresPosted(_) => "REVERSAL_REQUIRES_POSTED",
            Self::ReversalDateBeforeEntry { .. } => "REVERSAL_DATE_BEFORE_ENTRY",
            Self::AccrualWithoutReversalDate => "ACCRUAL_WITHOUT_REVERSAL_DATE",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::EmptyEntry
            | Self::UnbalancedEntry { .. }
            | Self::IntercompanyImbalance { .. }
            | Self::LineHasBothSides { .. }
            | Self::AccountInactive(_)
            | Self::RejectionReasonRequired
            | Self::AccrualWithoutReversalDate
            | Self::ReversalDateBeforeEntry { .. } => 400,

            // 403 Forbidden
            Self::InsufficientPrivileges { .. } => 403,

            // 404 Not Found
            Self::AccountNotFound(_) | Self::EntryNotFound(_) => 404,

            // 422 - state rules
            Self::InvalidTransition { .. }
            | Self::CannotModifyPosted
            | Self::CannotModifyVoid
            | Self::CanOnlyDeleteDraft
            | Self::ReversalRequiresPosted(_) => 422,
        }
    }
}

impl From<JournalError> for AppError {
    fn from(err: JournalError) -> Self {
        match err.http_status_code() {
            403 => Self::Forbidden(err.to_string()),
            404 => Self::NotFound(err.to_string()),
            422 => Self::BusinessRule(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(JournalError::EmptyEntry.error_code(), "EMPTY_ENTRY");
        assert_eq!(
            JournalError::UnbalancedEntry {
                debit: dec!(100),
                credit: dec!(50),
            }
            .error_code(),
            "UNBALANCED_ENTRY"
        );
        assert_eq!(
            JournalError::IntercompanyImbalance { entities: vec![] }.error_code(),
            "INTERCOMPANY_IMBALANCE"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(JournalError::EmptyEntry.http_status_code(), 400);
        assert_eq!(
            JournalError::InsufficientPrivileges {
                role: "staff".into(),
                action: "approve",
            }
            .http_status_code(),
            403
        );
        assert_eq!(
            JournalError::AccountNotFound("9999".into()).http_status_code(),
            404
        );
        assert_eq!(JournalError::CanOnlyDeleteDraft.http_status_code(), 422);
    }

    #[test]
    fn test_error_display() {
        let err = JournalError::UnbalancedEntry {
            debit: dec!(100.00),
            credit: dec!(50.00),
        };
        assert_eq!(
            err.to_string(),
            "Journal entry is not balanced. Debit: 100.00, Credit: 50.00"
        );

        let err = JournalError::IntercompanyImbalance {
            entities: vec!["A".into(), "B".into()],
        };
        assert_eq!(
            err.to_string(),
            "Intercompany entry is not balanced for entities: A, B"
        );
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = JournalError::CanOnlyDeleteDraft.into();
        assert_eq!(app.status_code(), 422);
        let app: AppError = JournalError::EmptyEntry.into();
        assert_eq!(app.error_code(), "VALIDATION_ERROR");
    }
}
