//! Reversing entries for posted journal entries and accruals.

use chrono::NaiveDate;
use ledgerwise_shared::types::JournalEntryId;

use super::entry::{EntryStatus, JournalEntry};
use super::error::JournalError;
use super::line::JournalLine;

/// Result of reversing an entry.
#[derive(Debug, Clone)]
pub struct Reversal {
    /// The new, posted mirror entry.
    pub reversing_entry: JournalEntry,
    /// Id of the entry being reversed; it becomes `Void`.
    pub original_id: JournalEntryId,
}

/// Stateless builder for reversing entries.
pub struct ReversalBuilder;

impl ReversalBuilder {
    /// Builds the mirror of a posted entry.
    ///
    /// Every line's debit and credit are swapped, memos are prefixed with
    /// `"Reversal: "` (a line without a memo gets `"Reversal"`), and the new
    /// entry points back via `reversal_of`.
    pub fn reverse(
        entry: &JournalEntry,
        reversal_date: NaiveDate,
    ) -> Result<Reversal, JournalError> {
        if entry.status != EntryStatus::Posted {
            return Err(JournalError::ReversalRequiresPosted(entry.status));
        }
        if reversal_date < entry.entry_date {
            return Err(JournalError::ReversalDateBeforeEntry {
                entry: entry.entry_date,
                reversal: reversal_date,
            });
        }

        let description = format!("Reversal of {}", entry.description);
        Ok(Reversal {
            reversing_entry: Self::mirror(entry, reversal_date, description),
            original_id: entry.id,
        })
    }

    /// Builds the automatic reversal of an accrual being posted.
    ///
    /// Returns `None` for non-accrual entries. The accrual itself stays
    /// posted; only the new entry is produced.
    pub fn accrual_reversal(entry: &JournalEntry) -> Result<Option<JournalEntry>, JournalError> {
        if !entry.is_accrual {
            return Ok(None);
        }
        let reversal_date = entry
            .reversal_date
            .ok_or(JournalError::AccrualWithoutReversalDate)?;
        if reversal_date < entry.entry_date {
            return Err(JournalError::ReversalDateBeforeEntry {
                entry: entry.entry_date,
                reversal: reversal_date,
            });
        }
        let description = format!("Auto-reversal of accrual: {}", entry.description);
        Ok(Some(Self::mirror(entry, reversal_date, description)))
    }

    fn mirror(entry: &JournalEntry, date: NaiveDate, description: String) -> JournalEntry {
        let lines = entry
            .lines
            .iter()
            .map(|line| JournalLine {
                account: line.account.clone(),
                entity_code: line.entity_code.clone(),
                amount: line.amount.flipped(),
                memo: Some(
                    line.memo
                        .as_deref()
                        .map_or_else(|| "Reversal".to_string(), |m| format!("Reversal: {m}")),
                ),
                dimensions: line.dimensions.clone(),
            })
            .collect();

        JournalEntry {
            id: JournalEntryId::new(),
            client_id: entry.client_id,
            entity_id: entry.entity_id,
            entry_date: date,
            description,
            reference: entry.reference.clone(),
            is_accrual: false,
            reversal_date: None,
            status: EntryStatus::Posted,
            reversal_of: Some(entry.id),
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::line::{AccountRef, EntryType, LineAmount};
    use ledgerwise_shared::types::{ClientId, EntityId};
    use rust_decimal_macros::dec;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn posted_entry() -> JournalEntry {
        let mut entry = JournalEntry::draft(
            ClientId::new(),
            EntityId::new(),
            date(1, 31),
            "Payroll accrual",
            vec![
                JournalLine::new(AccountRef::Code("6500".into()), "US", LineAmount::debit(dec!(4200))),
                JournalLine::new(AccountRef::Code("2200".into()), "US", LineAmount::credit(dec!(4200))),
            ],
        );
        entry.lines[0].memo = Some("January wages".into());
        entry.status = EntryStatus::Posted;
        entry
    }

    #[test]
    fn test_reverse_flips_every_line() {
        let original = posted_entry();
        let reversal = ReversalBuilder::reverse(&original, date(2, 1)).unwrap();
        let mirror = &reversal.reversing_entry;

        assert_eq!(reversal.original_id, original.id);
        assert_eq!(mirror.reversal_of, Some(original.id));
        assert_eq!(mirror.status, EntryStatus::Posted);
        assert_eq!(mirror.entry_date, date(2, 1));
        assert_eq!(mirror.lines[0].amount.entry_type(), EntryType::Credit);
        assert_eq!(mirror.lines[0].credit(), dec!(4200));
        assert_eq!(mirror.lines[1].debit(), dec!(4200));
        assert_eq!(mirror.lines[0].memo.as_deref(), Some("Reversal: January wages"));
        assert_eq!(mirror.lines[1].memo.as_deref(), Some("Reversal"));
        assert!(mirror.balance().is_balanced);
    }

    #[test]
    fn test_reverse_requires_posted() {
        let mut draft = posted_entry();
        draft.status = EntryStatus::Draft;
        assert!(matches!(
            ReversalBuilder::reverse(&draft, date(2, 1)),
            Err(JournalError::ReversalRequiresPosted(EntryStatus::Draft))
        ));
    }

    #[test]
    fn test_reverse_date_cannot_precede_entry() {
        assert!(matches!(
            ReversalBuilder::reverse(&posted_entry(), date(1, 1)),
            Err(JournalError::ReversalDateBeforeEntry { .. })
        ));
    }

    #[test]
    fn test_accrual_reversal() {
        let mut entry = posted_entry();
        assert!(ReversalBuilder::accrual_reversal(&entry).unwrap().is_none());

        entry.is_accrual = true;
        entry.reversal_date = Some(date(2, 1));
        let reversing = ReversalBuilder::accrual_reversal(&entry).unwrap().unwrap();
        assert_eq!(reversing.entry_date, date(2, 1));
        assert_eq!(reversing.reversal_of, Some(entry.id));
        assert!(!reversing.is_accrual);
        assert_eq!(reversing.lines[0].amount, entry.lines[0].amount.flipped());
    }
}
