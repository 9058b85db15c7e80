//! Whole-entry and per-entity balance computation.
//!
//! A multi-entity entry must balance as a whole *and* within every entity
//! code it touches. Standard double-entry balance alone is not enough: an
//! entry where entity A is debited 100 and credited 60 while entity B is
//! credited 40 balances overall but leaves both entities out of balance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amount::BALANCE_TOLERANCE;
use super::error::JournalError;
use super::line::{JournalLine, LineAmount};

/// Anything that can be summed by the balance validator.
pub trait BalanceLine {
    /// Entity code; blank lines are untagged.
    fn entity_code(&self) -> &str;
    /// Canonical amount.
    fn line_amount(&self) -> LineAmount;
}

impl BalanceLine for JournalLine {
    fn entity_code(&self) -> &str {
        &self.entity_code
    }

    fn line_amount(&self) -> LineAmount {
        self.amount
    }
}

/// Aggregate for one entity code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityBalance {
    /// Entity code as first seen.
    pub entity_code: String,
    /// Sum of debits.
    pub debit: Decimal,
    /// Sum of credits.
    pub credit: Decimal,
    /// Absolute difference.
    pub difference: Decimal,
    /// True if `difference` is under tolerance.
    pub is_balanced: bool,
}

/// Outcome of a balance check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BalanceStatus {
    /// Entry and every entity balance.
    Balanced,
    /// Entry totals differ.
    Unbalanced {
        /// Absolute difference.
        difference: Decimal,
    },
    /// Entry balances but some entities do not.
    IntercompanyImbalance {
        /// Out-of-balance entity codes, first-seen order.
        entities: Vec<String>,
    },
}

/// Totals for a set of lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryBalance {
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// Absolute difference.
    pub difference: Decimal,
    /// True if the entry balances as a whole.
    pub is_balanced: bool,
    /// Number of lines summed.
    pub line_count: usize,
    /// One aggregate per distinct entity code, in first-seen order.
    pub entity_balances: Vec<EntityBalance>,
}

impl EntryBalance {
    /// Computes totals for `lines`.
    ///
    /// Entity codes are matched after trimming and case-folding; the first
    /// spelling seen is kept for display.
    pub fn compute<L: BalanceLine>(lines: &[L]) -> Self {
        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;
        let mut entities: Vec<(String, EntityBalance)> = Vec::new();

        for line in lines {
            let amount = line.line_amount();
            total_debit += amount.debit_amount();
            total_credit += amount.credit_amount();

            let code = line.entity_code().trim();
            if code.is_empty() {
                continue;
            }
            let key = code.to_lowercase();
            let idx = match entities.iter().position(|(k, _)| *k == key) {
                Some(idx) => idx,
                None => {
                    entities.push((
                        key,
                        EntityBalance {
                            entity_code: code.to_string(),
                            debit: Decimal::ZERO,
                            credit: Decimal::ZERO,
                            difference: Decimal::ZERO,
                            is_balanced: true,
                        },
                    ));
                    entities.len() - 1
                }
            };
            let entry = &mut entities[idx].1;
            entry.debit += amount.debit_amount();
            entry.credit += amount.credit_amount();
        }

        let entity_balances = entities
            .into_iter()
            .map(|(_, mut balance)| {
                balance.difference = (balance.debit - balance.credit).abs();
                balance.is_balanced = balance.difference < BALANCE_TOLERANCE;
                balance
            })
            .collect();

        let difference = (total_debit - total_credit).abs();
        Self {
            total_debit,
            total_credit,
            difference,
            is_balanced: difference < BALANCE_TOLERANCE,
            line_count: lines.len(),
            entity_balances,
        }
    }

    /// Entity codes that fail their own balance check.
    pub fn unbalanced_entities(&self) -> Vec<String> {
        self.entity_balances
            .iter()
            .filter(|e| !e.is_balanced)
            .map(|e| e.entity_code.clone())
            .collect()
    }

    /// True if more than one entity code is present.
    #[must_use]
    pub fn is_intercompany(&self) -> bool {
        self.entity_balances.len() > 1
    }

    /// Classifies the balance. Whole-entry imbalance takes precedence.
    #[must_use]
    pub fn status(&self) -> BalanceStatus {
        if !self.is_balanced {
            return BalanceStatus::Unbalanced {
                difference: self.difference,
            };
        }
        let entities = self.unbalanced_entities();
        if entities.is_empty() {
            BalanceStatus::Balanced
        } else {
            BalanceStatus::IntercompanyImbalance { entities }
        }
    }

    /// Returns an error unless the entry may be posted.
    ///
    /// # Errors
    ///
    /// - `JournalError::EmptyEntry` when no lines were summed
    /// - `JournalError::UnbalancedEntry` when totals differ
    /// - `JournalError::IntercompanyImbalance` when an entity is off
    pub fn ensure_postable(&self) -> Result<(), JournalError> {
        if self.line_count == 0 {
            return Err(JournalError::EmptyEntry);
        }
        match self.status() {
            BalanceStatus::Balanced => Ok(()),
            BalanceStatus::Unbalanced { .. } => Err(JournalError::UnbalancedEntry {
                debit: self.total_debit,
                credit: self.total_credit,
            }),
            BalanceStatus::IntercompanyImbalance { entities } => {
                Err(JournalError::IntercompanyImbalance { entities })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::line::AccountRef;
    use rust_decimal_macros::dec;

    fn line(entity: &str, amount: LineAmount) -> JournalLine {
        JournalLine::new(AccountRef::Code("1000".into()), entity, amount)
    }

    #[test]
    fn test_single_entity_balanced() {
        let lines = vec![
            line("A", LineAmount::debit(dec!(100))),
            line("A", LineAmount::credit(dec!(100))),
        ];
        let balance = EntryBalance::compute(&lines);

        assert!(balance.is_balanced);
        assert_eq!(balance.entity_balances.len(), 1);
        let a = &balance.entity_balances[0];
        assert_eq!(a.entity_code, "A");
        assert_eq!(a.debit, dec!(100));
        assert_eq!(a.credit, dec!(100));
        assert!(a.is_balanced);
        assert_eq!(balance.status(), BalanceStatus::Balanced);
        assert!(balance.ensure_postable().is_ok());
    }

    #[test]
    fn test_intercompany_imbalance_fires_despite_overall_balance() {
        let lines = vec![
            line("A", LineAmount::debit(dec!(100))),
            line("A", LineAmount::credit(dec!(60))),
            line("B", LineAmount::credit(dec!(40))),
        ];
        let balance = EntryBalance::compute(&lines);

        assert!(balance.is_balanced);
        assert_eq!(balance.entity_balances[0].difference, dec!(40));
        assert!(!balance.entity_balances[0].is_balanced);
        assert_eq!(
            balance.status(),
            BalanceStatus::IntercompanyImbalance {
                entities: vec!["A".into(), "B".into()]
            }
        );
        assert!(matches!(
            balance.ensure_postable(),
            Err(JournalError::IntercompanyImbalance { .. })
        ));
    }

    #[test]
    fn test_unbalanced_takes_precedence() {
        let lines = vec![
            line("A", LineAmount::debit(dec!(100))),
            line("B", LineAmount::credit(dec!(90))),
        ];
        let balance = EntryBalance::compute(&lines);
        assert_eq!(
            balance.status(),
            BalanceStatus::Unbalanced {
                difference: dec!(10)
            }
        );
    }

    #[test]
    fn test_entity_order_and_case_folding() {
        let lines = vec![
            line("b", LineAmount::debit(dec!(5))),
            line("A", LineAmount::debit(dec!(5))),
            line("B", LineAmount::credit(dec!(5))),
            line("a", LineAmount::credit(dec!(5))),
        ];
        let balance = EntryBalance::compute(&lines);
        let codes: Vec<_> = balance
            .entity_balances
            .iter()
            .map(|e| e.entity_code.as_str())
            .collect();
        assert_eq!(codes, vec!["b", "A"]);
        assert!(balance.entity_balances.iter().all(|e| e.is_balanced));
    }

    #[test]
    fn test_untagged_lines_count_only_toward_totals() {
        let lines = vec![
            line("", LineAmount::debit(dec!(50))),
            line("  ", LineAmount::credit(dec!(50))),
        ];
        let balance = EntryBalance::compute(&lines);
        assert!(balance.is_balanced);
        assert!(balance.entity_balances.is_empty());
        assert!(!balance.is_intercompany());
    }

    #[test]
    fn test_within_tolerance() {
        let lines = vec![
            line("A", LineAmount::debit(dec!(100.004))),
            line("A", LineAmount::credit(dec!(100))),
        ];
        assert!(EntryBalance::compute(&lines).is_balanced);

        let lines = vec![
            line("A", LineAmount::debit(dec!(100.01))),
            line("A", LineAmount::credit(dec!(100))),
        ];
        assert!(!EntryBalance::compute(&lines).is_balanced);
    }

    #[test]
    fn test_empty_entry_not_postable() {
        let balance = EntryBalance::compute::<JournalLine>(&[]);
        assert!(matches!(
            balance.ensure_postable(),
            Err(JournalError::EmptyEntry)
        ));
    }
}
