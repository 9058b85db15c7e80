//! Property-based tests for the balance validator.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::amount::BALANCE_TOLERANCE;
use super::balance::{BalanceStatus, EntryBalance};
use super::line::{AccountRef, JournalLine, LineAmount};

fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn entity_code() -> impl Strategy<Value = String> {
    prop_oneof![Just("A".to_string()), Just("B".to_string()), Just("C".to_string())]
}

fn line(entity: &str, amount: LineAmount) -> JournalLine {
    JournalLine::new(AccountRef::Code("1000".into()), entity, amount)
}

/// Balanced pairs per entity: every entity slice balances.
fn balanced_lines() -> impl Strategy<Value = Vec<JournalLine>> {
    prop::collection::vec((entity_code(), positive_amount()), 1..8).prop_map(|pairs| {
        pairs
            .into_iter()
            .flat_map(|(entity, amount)| {
                [
                    line(&entity, LineAmount::debit(amount)),
                    line(&entity, LineAmount::credit(amount)),
                ]
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Whenever the entry reports balanced, totals agree within tolerance.
    #[test]
    fn prop_balanced_means_totals_agree(
        lines in prop::collection::vec(
            (entity_code(), (-1_000_000i64..1_000_000i64).prop_map(|c| Decimal::new(c, 2))),
            0..12,
        )
    ) {
        let lines: Vec<_> = lines
            .into_iter()
            .map(|(e, a)| line(&e, LineAmount::from_signed(a)))
            .collect();
        let balance = EntryBalance::compute(&lines);
        if balance.is_balanced {
            prop_assert!((balance.total_debit - balance.total_credit).abs() < BALANCE_TOLERANCE);
        }
        let entity_debits: Decimal = balance.entity_balances.iter().map(|e| e.debit).sum();
        prop_assert_eq!(entity_debits, balance.total_debit);
    }

    /// Per-entity balanced pairs are always postable, whatever the order.
    #[test]
    fn prop_balanced_pairs_postable(lines in balanced_lines().prop_shuffle()) {
        let balance = EntryBalance::compute(&lines);
        prop_assert_eq!(balance.status(), BalanceStatus::Balanced);
        prop_assert!(balance.ensure_postable().is_ok());
    }

    /// Moving an amount between two entities keeps the whole entry balanced
    /// but raises an intercompany imbalance.
    #[test]
    fn prop_cross_entity_shift_flags_intercompany(
        base in balanced_lines(),
        shift in positive_amount(),
    ) {
        let mut lines = base;
        lines.push(line("A", LineAmount::debit(shift)));
        lines.push(line("B", LineAmount::credit(shift)));

        let balance = EntryBalance::compute(&lines);
        prop_assert!(balance.is_balanced);
        let is_intercompany_imbalance = matches!(
            balance.status(),
            BalanceStatus::IntercompanyImbalance { .. }
        );
        prop_assert!(is_intercompany_imbalance);
        prop_assert!(balance.ensure_postable().is_err());
    }
}
