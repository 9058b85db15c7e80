//! Property-based tests for line amount normalization.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::line::{
    AmountCell, DebitCreditAmount, EntryType, LineAmount, TypedAmount, WireLineAmount, credit_of,
    debit_of,
};

/// Amounts from -1,000,000.00 to 1,000,000.00.
fn signed_amount() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Amounts from 0.01 to 1,000,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn entry_type_strategy() -> impl Strategy<Value = EntryType> {
    prop_oneof![Just(EntryType::Debit), Just(EntryType::Credit)]
}

/// Numbers, formatted text, or garbage.
fn amount_cell() -> impl Strategy<Value = AmountCell> {
    prop_oneof![
        signed_amount().prop_map(AmountCell::Number),
        signed_amount().prop_map(|d| AmountCell::Text(format!("$ {d}"))),
        "[a-z ]{0,6}".prop_map(AmountCell::Text),
    ]
}

/// Wire lines in either shape.
fn wire_line() -> impl Strategy<Value = WireLineAmount> {
    let sides = (proptest::option::of(amount_cell()), proptest::option::of(amount_cell())).prop_map(
        |(debit, credit)| WireLineAmount {
            debit,
            credit,
            ..Default::default()
        },
    );
    let typed = ("debit|credit|dr|cr|other", proptest::option::of(amount_cell())).prop_map(
        |(entry_type, amount)| WireLineAmount {
            entry_type: Some(entry_type),
            amount,
            ..Default::default()
        },
    );
    prop_oneof![sides, typed]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Debit and credit are never both non-zero after normalization.
    #[test]
    fn prop_sides_mutually_exclusive(wire in wire_line()) {
        let debit = debit_of(&wire);
        let credit = credit_of(&wire);
        prop_assert!(debit >= Decimal::ZERO);
        prop_assert!(credit >= Decimal::ZERO);
        prop_assert!(debit.is_zero() || credit.is_zero());
        prop_assert_eq!(debit > Decimal::ZERO, credit.is_zero() && !debit.is_zero());
    }

    /// (debit, credit) → (type, amount) → (debit, credit) keeps the
    /// non-zero side exactly.
    #[test]
    fn prop_representation_round_trip(amount in positive_amount(), side in entry_type_strategy()) {
        let pair = match side {
            EntryType::Debit => DebitCreditAmount { debit: amount, credit: Decimal::ZERO },
            EntryType::Credit => DebitCreditAmount { debit: Decimal::ZERO, credit: amount },
        };
        let canonical = LineAmount::try_from(pair).unwrap();
        let typed = TypedAmount::from(canonical);
        prop_assert_eq!(typed.entry_type, side);
        prop_assert_eq!(typed.amount, amount);

        let back = DebitCreditAmount::from(LineAmount::from(typed));
        prop_assert_eq!(back, pair);
    }

    /// Flipping twice is the identity and swaps sides once.
    #[test]
    fn prop_flip_swaps_sides(amount in signed_amount()) {
        let line = LineAmount::from_signed(amount);
        prop_assert_eq!(line.flipped().flipped(), line);
        prop_assert_eq!(line.flipped().debit_amount(), line.credit_amount());
        prop_assert_eq!(line.flipped().credit_amount(), line.debit_amount());
    }
}
