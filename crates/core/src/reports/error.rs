//! Report error types.

use chrono::NaiveDate;
use ledgerwise_shared::AppError;
use ledgerwise_shared::types::{AccountId, ConsolidationGroupId};
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Totals reference an account outside the chart.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Consolidation group has no members.
    #[error("Consolidation group {0} has no member entities")]
    EmptyConsolidationGroup(ConsolidationGroupId),
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::EmptyConsolidationGroup(_) => "EMPTY_CONSOLIDATION_GROUP",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::AccountNotFound(_) => 404,
            Self::InvalidDateRange { .. } => 400,
            Self::EmptyConsolidationGroup(_) => 422,
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err.http_status_code() {
            404 => Self::NotFound(err.to_string()),
            422 => Self::BusinessRule(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
