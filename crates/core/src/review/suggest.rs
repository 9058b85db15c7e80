//! Heuristic remediation for unknown accounts and dimension values.

use serde_json::json;

use crate::accounts::{Account, ChartIndex};
use crate::dimension::{DimensionCatalog, DimensionValue, PendingDimensionValue};

use super::types::{SuggestionAction, SuggestionKind};

/// Largest edit distance still considered a typo.
const MAX_TYPO_DISTANCE: usize = 2;

/// Levenshtein distance over characters.
pub(crate) fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn alnum_key(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Closest active account to an unknown code.
///
/// Prefers a code equal after dropping punctuation, then an account whose
/// name equals the text, then the nearest code within a small edit distance.
pub(crate) fn closest_account<'a>(chart: &'a ChartIndex, raw: &str) -> Option<&'a Account> {
    let wanted = alnum_key(raw);
    let active = || chart.accounts().iter().filter(|a| a.is_active);

    active()
        .find(|a| alnum_key(&a.code) == wanted)
        .or_else(|| active().find(|a| a.name.trim().eq_ignore_ascii_case(raw.trim())))
        .or_else(|| {
            active()
                .map(|a| (edit_distance(&alnum_key(&a.code), &wanted), a))
                .filter(|(d, _)| *d <= MAX_TYPO_DISTANCE)
                .min_by_key(|(d, _)| *d)
                .map(|(_, a)| a)
        })
}

/// Closest active value of the pending value's dimension.
pub(crate) fn closest_value<'a>(
    catalog: &'a DimensionCatalog,
    pending: &PendingDimensionValue,
) -> Option<&'a DimensionValue> {
    let wanted = pending.value_name.to_lowercase();
    catalog
        .values_of(pending.dimension_id)
        .filter(|v| v.is_active)
        .map(|v| (edit_distance(&v.name.to_lowercase(), &wanted), v))
        .filter(|(d, _)| *d <= MAX_TYPO_DISTANCE)
        .min_by_key(|(d, _)| *d)
        .map(|(_, v)| v)
}

/// Action replacing a row's account code.
pub(crate) fn change_account_code(row: usize, code: &str) -> SuggestionAction {
    SuggestionAction {
        kind: SuggestionKind::ChangeAccountCode,
        payload: json!({ "row": row, "field": "accountCode", "value": code }),
    }
}

/// Action replacing a row's dimension cell.
pub(crate) fn set_dimension_value(row: usize, header: &str, value: &str) -> SuggestionAction {
    SuggestionAction {
        kind: SuggestionKind::SetDimensionValue,
        payload: json!({ "row": row, "field": header, "value": value }),
    }
}

/// Action approving a new dimension value.
pub(crate) fn create_dimension_value(pending: &PendingDimensionValue) -> SuggestionAction {
    SuggestionAction {
        kind: SuggestionKind::CreateDimensionValue,
        payload: json!({
            "dimensionId": pending.dimension_id,
            "dimensionName": pending.dimension_name,
            "value": pending.value_name,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("1000", "1000"), 0);
        assert_eq!(edit_distance("1000", "1001"), 1);
        assert_eq!(edit_distance("sales", "sals"), 1);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_alnum_key() {
        assert_eq!(alnum_key("10-00"), "1000");
        assert_eq!(alnum_key(" Cash.01 "), "cash01");
    }
}
