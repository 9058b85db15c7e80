//! Journal entry header and status.

use std::fmt;

use chrono::NaiveDate;
use ledgerwise_shared::types::{ClientId, EntityId, JournalEntryId};
use serde::{Deserialize, Serialize};

use super::balance::EntryBalance;
use super::error::JournalError;
use super::line::JournalLine;

/// Journal entry status.
///
/// Valid transitions:
/// - Draft → PendingApproval (submit by staff)
/// - Draft → Posted (submit by privileged actor)
/// - PendingApproval → Posted (approve)
/// - PendingApproval → Draft (reject)
/// - Posted → Void (reverse)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Being drafted; editable and deletable.
    Draft,
    /// Waiting for a privileged approver.
    PendingApproval,
    /// Posted to the ledger (immutable).
    Posted,
    /// Reversed (immutable).
    Void,
}

impl EntryStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingApproval => "pending_approval",
            Self::Posted => "posted",
            Self::Void => "void",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "pending_approval" | "pending" => Some(Self::PendingApproval),
            "posted" => Some(Self::Posted),
            "void" | "voided" => Some(Self::Void),
            _ => None,
        }
    }

    /// Returns true if the entry is immutable.
    #[must_use]
    pub fn is_immutable(&self) -> bool {
        matches!(self, Self::Posted | Self::Void)
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A journal entry with its lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Entry id.
    pub id: JournalEntryId,
    /// Owning client.
    pub client_id: ClientId,
    /// Entity the entry is booked under.
    pub entity_id: EntityId,
    /// Entry date.
    pub entry_date: NaiveDate,
    /// Description.
    pub description: String,
    /// External reference number.
    pub reference: Option<String>,
    /// Accrual entries reverse automatically on `reversal_date`.
    pub is_accrual: bool,
    /// Date of the automatic reversal for accruals.
    pub reversal_date: Option<NaiveDate>,
    /// Current status.
    pub status: EntryStatus,
    /// Entry this one reverses, if any.
    pub reversal_of: Option<JournalEntryId>,
    /// Ordered lines.
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Creates a new draft entry.
    #[must_use]
    pub fn draft(
        client_id: ClientId,
        entity_id: EntityId,
        entry_date: NaiveDate,
        description: impl Into<String>,
        lines: Vec<JournalLine>,
    ) -> Self {
        Self {
            id: JournalEntryId::new(),
            client_id,
            entity_id,
            entry_date,
            description: description.into(),
            reference: None,
            is_accrual: false,
            reversal_date: None,
            status: EntryStatus::Draft,
            reversal_of: None,
            lines,
        }
    }

    /// Computes the balance over the entry's lines.
    #[must_use]
    pub fn balance(&self) -> EntryBalance {
        EntryBalance::compute(&self.lines)
    }

    /// Checks the entry has at least one line. Applies to every status.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::EmptyEntry` when there are no lines.
    pub fn ensure_has_lines(&self) -> Result<(), JournalError> {
        if self.lines.is_empty() {
            return Err(JournalError::EmptyEntry);
        }
        Ok(())
    }

    /// Checks the entry can be posted.
    ///
    /// # Errors
    ///
    /// Returns the first balance or accrual rule the entry violates.
    pub fn validate_for_posting(&self) -> Result<EntryBalance, JournalError> {
        let balance = self.balance();
        balance.ensure_postable()?;

        if self.is_accrual {
            let reversal = self
                .reversal_date
                .ok_or(JournalError::AccrualWithoutReversalDate)?;
            if reversal < self.entry_date {
                return Err(JournalError::ReversalDateBeforeEntry {
                    entry: self.entry_date,
                    reversal,
                });
            }
        }
        Ok(balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::line::{AccountRef, LineAmount};
    use rust_decimal_macros::dec;

    fn balanced_entry() -> JournalEntry {
        JournalEntry::draft(
            ClientId::new(),
            EntityId::new(),
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            "Accrued rent",
            vec![
                JournalLine::new(AccountRef::Code("6100".into()), "HQ", LineAmount::debit(dec!(1500))),
                JournalLine::new(AccountRef::Code("2100".into()), "HQ", LineAmount::credit(dec!(1500))),
            ],
        )
    }

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!(EntryStatus::parse("pending"), Some(EntryStatus::PendingApproval));
        assert_eq!(EntryStatus::parse("VOIDED"), Some(EntryStatus::Void));
        assert_eq!(EntryStatus::parse("approved"), None);
        assert_eq!(EntryStatus::PendingApproval.to_string(), "pending_approval");
        assert!(EntryStatus::Posted.is_immutable());
        assert!(!EntryStatus::Draft.is_immutable());
    }

    #[test]
    fn test_accrual_requires_reversal_date() {
        let mut entry = balanced_entry();
        entry.is_accrual = true;
        assert!(matches!(
            entry.validate_for_posting(),
            Err(JournalError::AccrualWithoutReversalDate)
        ));

        entry.reversal_date = NaiveDate::from_ymd_opt(2026, 3, 1);
        assert!(matches!(
            entry.validate_for_posting(),
            Err(JournalError::ReversalDateBeforeEntry { .. })
        ));

        entry.reversal_date = NaiveDate::from_ymd_opt(2026, 4, 1);
        assert!(entry.validate_for_posting().is_ok());
    }

    #[test]
    fn test_unbalanced_entry_rejected() {
        let mut entry = balanced_entry();
        entry.lines[1].amount = LineAmount::credit(dec!(1400));
        assert!(matches!(
            entry.validate_for_posting(),
            Err(JournalError::UnbalancedEntry { .. })
        ));
    }

    #[test]
    fn test_entry_without_lines_rejected() {
        let mut entry = balanced_entry();
        assert!(entry.ensure_has_lines().is_ok());

        entry.lines.clear();
        assert!(matches!(entry.ensure_has_lines(), Err(JournalError::EmptyEntry)));
    }
}
