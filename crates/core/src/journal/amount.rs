//! Permissive amount parsing for imported and form-entered values.
//!
//! Amount cells come from spreadsheets, bank exports, and hand-typed forms.
//! Parsing never fails: anything that cannot be read as a number becomes
//! zero. Callers that need to know whether a value was lost use
//! [`try_parse_amount`] and surface a warning instead of an error.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Tolerance under which debits and credits are considered equal.
///
/// One cent. Every balance decision in the workspace uses this value.
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Strips currency symbols, thousands separators, and whitespace.
///
/// Accounting-style parentheses are rewritten as a leading minus sign, so
/// `"(1,200.50)"` becomes `"-1200.50"`.
#[must_use]
pub fn sanitize_amount(raw: &str) -> String {
    let trimmed = raw.trim();
    let negative_parens = trimmed.starts_with('(') && trimmed.ends_with(')');

    let mut cleaned: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if negative_parens && !cleaned.starts_with('-') {
        cleaned.insert(0, '-');
    }
    cleaned
}

/// Parses an amount, returning `None` when a non-blank value cannot be read.
///
/// Blank input is a legitimate "no amount" and yields `Some(0)`.
#[must_use]
pub fn try_parse_amount(raw: &str) -> Option<Decimal> {
    if raw.trim().is_empty() {
        return Some(Decimal::ZERO);
    }
    let cleaned = sanitize_amount(raw);
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Parses an amount, treating anything unreadable as zero.
#[must_use]
pub fn parse_amount(raw: &str) -> Decimal {
    try_parse_amount(raw).unwrap_or(Decimal::ZERO)
}

/// Returns true when two amounts are equal within [`BALANCE_TOLERANCE`].
#[must_use]
pub fn within_tolerance(left: Decimal, right: Decimal) -> bool {
    (left - right).abs() < BALANCE_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("1,234.56", dec!(1234.56))]
    #[case("$ 1,000", dec!(1000))]
    #[case("€99.90", dec!(99.90))]
    #[case("  42  ", dec!(42))]
    #[case("(1,200.50)", dec!(-1200.50))]
    #[case("-15.25", dec!(-15.25))]
    #[case("USD 7.5", dec!(7.5))]
    fn test_parse_amount_sanitizes(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(raw), expected);
    }

    #[rstest]
    #[case("abc")]
    #[case("1.2.3")]
    #[case("--")]
    #[case("$")]
    fn test_unparseable_amount_is_zero(#[case] raw: &str) {
        assert_eq!(parse_amount(raw), Decimal::ZERO);
        assert_eq!(try_parse_amount(raw), None);
    }

    #[test]
    fn test_blank_amount_is_zero_not_lost() {
        assert_eq!(try_parse_amount(""), Some(Decimal::ZERO));
        assert_eq!(try_parse_amount("   "), Some(Decimal::ZERO));
    }

    #[test]
    fn test_balance_tolerance_is_one_cent() {
        assert_eq!(BALANCE_TOLERANCE, dec!(0.01));
        assert!(within_tolerance(dec!(100), dec!(100.009)));
        assert!(!within_tolerance(dec!(100), dec!(100.01)));
    }
}
