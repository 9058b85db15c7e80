//! Turning parsed rows into candidate entries.

use std::collections::HashMap;

use crate::import::{ImportRow, resolve_field};

use super::types::{EntryGroup, GroupKey, GroupState};

/// Key for a row: its reference, else its date and description.
///
/// Rows with none of the three stand alone.
fn group_key(row: &ImportRow) -> GroupKey {
    if let Some(reference) = resolve_field(row, "reference") {
        return GroupKey(format!("ref:{}", reference.to_lowercase()));
    }
    let date = resolve_field(row, "entryDate");
    let description = resolve_field(row, "description");
    if date.is_none() && description.is_none() {
        return GroupKey(format!("row:{}", row.row_number));
    }
    GroupKey(format!(
        "{}|{}",
        date.unwrap_or_default(),
        description.unwrap_or_default().to_lowercase()
    ))
}

/// Groups rows into entries, keeping first-seen order and row numbers.
#[must_use]
pub fn group_rows(rows: Vec<ImportRow>) -> Vec<EntryGroup> {
    let mut groups: Vec<EntryGroup> = Vec::new();
    let mut positions: HashMap<GroupKey, usize> = HashMap::new();

    for row in rows {
        let key = group_key(&row);
        match positions.get(&key) {
            Some(&idx) => groups[idx].rows.push(row),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push(EntryGroup {
                    key,
                    rows: vec![row],
                    state: GroupState::Parsed,
                    validation: None,
                    selected: false,
                });
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(n: usize, cells: &[(&str, &str)]) -> ImportRow {
        ImportRow::new(n, cells.iter().copied())
    }

    #[test]
    fn test_groups_by_reference_preserving_order() {
        let rows = vec![
            row(2, &[("Reference", "JE-2"), ("Account", "1000")]),
            row(3, &[("Reference", "JE-1"), ("Account", "2000")]),
            row(4, &[("Reference", "je-2"), ("Account", "4000")]),
        ];
        let groups = group_rows(rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key.as_str(), "ref:je-2");
        let numbers: Vec<_> = groups[0].rows.iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, vec![2, 4]);
        assert_eq!(groups[1].state, GroupState::Parsed);
    }

    #[test]
    fn test_groups_by_date_and_description_without_reference() {
        let rows = vec![
            row(2, &[("Date", "2026-01-31"), ("Description", "Rent")]),
            row(3, &[("Date", "2026-01-31"), ("Description", "rent")]),
            row(4, &[("Date", "2026-02-28"), ("Description", "Rent")]),
            row(5, &[("Account", "1000")]),
        ];
        let groups = group_rows(rows);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].rows.len(), 2);
        assert_eq!(groups[2].key.as_str(), "row:5");
    }
}
