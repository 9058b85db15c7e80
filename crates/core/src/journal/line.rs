//! Journal entry lines and the canonical signed amount.
//!
//! Lines travel in two interchangeable shapes: a `(debit, credit)` pair and
//! a `(type, amount)` pair. Both are converted into [`LineAmount`] at the
//! boundary; nothing downstream looks at the wire shapes.

use ledgerwise_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amount::parse_amount;
use super::error::JournalError;
use crate::dimension::DimensionTag;

/// Entry type: either Debit or Credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Debit entry.
    Debit,
    /// Credit entry.
    Credit,
}

impl EntryType {
    /// Parses common spellings (`debit`, `dr`, `d`, `credit`, `cr`, `c`).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "debit" | "dr" | "d" => Some(Self::Debit),
            "credit" | "cr" | "c" => Some(Self::Credit),
            _ => None,
        }
    }

    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

/// Canonical signed line amount: positive is a debit, negative a credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineAmount(Decimal);

impl LineAmount {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Builds a debit of `amount`. Negative amounts land on the credit side.
    #[must_use]
    pub fn debit(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Builds a credit of `amount`. Negative amounts land on the debit side.
    #[must_use]
    pub fn credit(amount: Decimal) -> Self {
        Self(-amount)
    }

    /// Builds an amount from a signed value.
    #[must_use]
    pub const fn from_signed(signed: Decimal) -> Self {
        Self(signed)
    }

    /// Builds an amount from a `(debit, credit)` pair, rejecting pairs where
    /// both sides carry a value.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::LineHasBothSides` if both sides are non-zero.
    pub fn try_from_sides(debit: Decimal, credit: Decimal) -> Result<Self, JournalError> {
        if !debit.is_zero() && !credit.is_zero() {
            return Err(JournalError::LineHasBothSides { debit, credit });
        }
        Ok(Self(debit - credit))
    }

    /// Builds an amount from a `(type, amount)` pair.
    #[must_use]
    pub fn from_typed(entry_type: EntryType, amount: Decimal) -> Self {
        match entry_type {
            EntryType::Debit => Self::debit(amount),
            EntryType::Credit => Self::credit(amount),
        }
    }

    /// Returns the signed value.
    #[must_use]
    pub const fn signed(self) -> Decimal {
        self.0
    }

    /// Returns the debit side (zero for credits).
    #[must_use]
    pub fn debit_amount(self) -> Decimal {
        self.0.max(Decimal::ZERO)
    }

    /// Returns the credit side (zero for debits).
    #[must_use]
    pub fn credit_amount(self) -> Decimal {
        (-self.0).max(Decimal::ZERO)
    }

    /// Returns the unsigned magnitude.
    #[must_use]
    pub fn magnitude(self) -> Decimal {
        self.0.abs()
    }

    /// Returns the side this amount sits on. Zero is a debit by convention.
    #[must_use]
    pub fn entry_type(self) -> EntryType {
        if self.0.is_sign_negative() && !self.0.is_zero() {
            EntryType::Credit
        } else {
            EntryType::Debit
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Returns the same magnitude on the opposite side.
    #[must_use]
    pub fn flipped(self) -> Self {
        Self(-self.0)
    }
}

/// `(debit, credit)` wire shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DebitCreditAmount {
    /// Debit side.
    pub debit: Decimal,
    /// Credit side.
    pub credit: Decimal,
}

impl From<LineAmount> for DebitCreditAmount {
    fn from(amount: LineAmount) -> Self {
        Self {
            debit: amount.debit_amount(),
            credit: amount.credit_amount(),
        }
    }
}

impl TryFrom<DebitCreditAmount> for LineAmount {
    type Error = JournalError;

    fn try_from(value: DebitCreditAmount) -> Result<Self, Self::Error> {
        Self::try_from_sides(value.debit, value.credit)
    }
}

/// `(type, amount)` wire shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedAmount {
    /// Side of the line.
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Unsigned amount.
    pub amount: Decimal,
}

impl From<LineAmount> for TypedAmount {
    fn from(amount: LineAmount) -> Self {
        Self {
            entry_type: amount.entry_type(),
            amount: amount.magnitude(),
        }
    }
}

impl From<TypedAmount> for LineAmount {
    fn from(value: TypedAmount) -> Self {
        Self::from_typed(value.entry_type, value.amount)
    }
}

/// A cell that may hold a number or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountCell {
    /// Numeric value.
    Number(Decimal),
    /// Text that still needs sanitizing.
    Text(String),
}

impl AmountCell {
    /// Reads the cell permissively; unreadable text is zero.
    #[must_use]
    pub fn value(&self) -> Decimal {
        match self {
            Self::Number(n) => *n,
            Self::Text(s) => parse_amount(s),
        }
    }
}

/// Loosely-typed line amount as it arrives from forms and uploads.
///
/// Either the `(debit, credit)` fields or the `(type, amount)` fields are
/// populated. Malformed pieces read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireLineAmount {
    /// Debit column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debit: Option<AmountCell>,
    /// Credit column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit: Option<AmountCell>,
    /// `debit` / `credit` marker for the typed shape.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub entry_type: Option<String>,
    /// Amount for the typed shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountCell>,
}

impl WireLineAmount {
    /// Normalizes into the canonical amount. Both-sided pairs are netted.
    #[must_use]
    pub fn normalize(&self) -> LineAmount {
        if self.debit.is_some() || self.credit.is_some() {
            let debit = self.debit.as_ref().map_or(Decimal::ZERO, AmountCell::value);
            let credit = self.credit.as_ref().map_or(Decimal::ZERO, AmountCell::value);
            return LineAmount::from_signed(debit - credit);
        }

        let amount = self.amount.as_ref().map_or(Decimal::ZERO, AmountCell::value);
        match self.entry_type.as_deref().and_then(EntryType::parse) {
            Some(entry_type) => LineAmount::from_typed(entry_type, amount),
            None => LineAmount::ZERO,
        }
    }
}

/// Debit side of a loosely-typed line, never negative.
#[must_use]
pub fn debit_of(line: &WireLineAmount) -> Decimal {
    line.normalize().debit_amount()
}

/// Credit side of a loosely-typed line, never negative.
#[must_use]
pub fn credit_of(line: &WireLineAmount) -> Decimal {
    line.normalize().credit_amount()
}

/// How a line names its account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRef {
    /// Resolved account id.
    Id(AccountId),
    /// Account code as typed or imported.
    Code(String),
}

/// A single journal entry line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Account posted to.
    pub account: AccountRef,
    /// Entity code used for intercompany balancing. Blank means untagged.
    pub entity_code: String,
    /// Canonical amount.
    pub amount: LineAmount,
    /// Optional line memo.
    pub memo: Option<String>,
    /// Dimension tags.
    #[serde(default)]
    pub dimensions: Vec<DimensionTag>,
}

impl JournalLine {
    /// Creates a line without memo or tags.
    #[must_use]
    pub fn new(account: AccountRef, entity_code: impl Into<String>, amount: LineAmount) -> Self {
        Self {
            account,
            entity_code: entity_code.into(),
            amount,
            memo: None,
            dimensions: Vec::new(),
        }
    }

    /// Debit side of the line.
    #[must_use]
    pub fn debit(&self) -> Decimal {
        self.amount.debit_amount()
    }

    /// Credit side of the line.
    #[must_use]
    pub fn credit(&self) -> Decimal {
        self.amount.credit_amount()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn text(s: &str) -> Option<AmountCell> {
        Some(AmountCell::Text(s.to_string()))
    }

    #[test]
    fn test_debit_credit_shape() {
        let wire = WireLineAmount {
            debit: text("$1,250.00"),
            credit: None,
            ..Default::default()
        };
        assert_eq!(debit_of(&wire), dec!(1250.00));
        assert_eq!(credit_of(&wire), Decimal::ZERO);
    }

    #[test]
    fn test_typed_shape() {
        let wire = WireLineAmount {
            entry_type: Some("Credit".to_string()),
            amount: Some(AmountCell::Number(dec!(80))),
            ..Default::default()
        };
        assert_eq!(debit_of(&wire), Decimal::ZERO);
        assert_eq!(credit_of(&wire), dec!(80));
    }

    #[test]
    fn test_malformed_sides_default_to_zero() {
        let wire = WireLineAmount {
            debit: text("n/a"),
            credit: text(""),
            ..Default::default()
        };
        assert_eq!(debit_of(&wire), Decimal::ZERO);
        assert_eq!(credit_of(&wire), Decimal::ZERO);

        let unknown_type = WireLineAmount {
            entry_type: Some("transfer".to_string()),
            amount: text("10"),
            ..Default::default()
        };
        assert_eq!(debit_of(&unknown_type), Decimal::ZERO);
        assert_eq!(credit_of(&unknown_type), Decimal::ZERO);
    }

    #[test]
    fn test_negative_debit_moves_to_credit() {
        let wire = WireLineAmount {
            debit: text("(50)"),
            ..Default::default()
        };
        assert_eq!(debit_of(&wire), Decimal::ZERO);
        assert_eq!(credit_of(&wire), dec!(50));
    }

    #[test]
    fn test_zero_converts_to_debit_zero() {
        let typed = TypedAmount::from(LineAmount::ZERO);
        assert_eq!(typed.entry_type, EntryType::Debit);
        assert_eq!(typed.amount, Decimal::ZERO);
    }

    #[test]
    fn test_both_sides_rejected_at_strict_boundary() {
        let pair = DebitCreditAmount {
            debit: dec!(10),
            credit: dec!(5),
        };
        assert!(matches!(
            LineAmount::try_from(pair),
            Err(JournalError::LineHasBothSides { .. })
        ));
    }

    #[test]
    fn test_wire_amount_deserializes_numbers_and_text() {
        let wire: WireLineAmount =
            serde_json::from_str(r#"{"debit": 100, "credit": "1,000.50"}"#).unwrap();
        assert_eq!(wire.normalize().signed(), dec!(-900.50));

        let typed: WireLineAmount =
            serde_json::from_str(r#"{"type": "debit", "amount": "12.34"}"#).unwrap();
        assert_eq!(debit_of(&typed), dec!(12.34));
    }

    #[test]
    fn test_entry_type_parse() {
        assert_eq!(EntryType::parse("DR"), Some(EntryType::Debit));
        assert_eq!(EntryType::parse(" credit "), Some(EntryType::Credit));
        assert_eq!(EntryType::parse("x"), None);
        assert_eq!(EntryType::Debit.opposite(), EntryType::Credit);
    }
}
