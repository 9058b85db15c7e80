//! Property tests for selective commit.

use ledgerwise_shared::types::{ClientId, EntityId};
use proptest::prelude::*;

use super::fixtures::{catalog, chart, line};
use super::{GroupFilter, GroupKey, ReviewSession};
use crate::import::ImportRow;

/// (balanced, selected) per group.
fn batch() -> impl Strategy<Value = Vec<(bool, bool)>> {
    prop::collection::vec((any::<bool>(), any::<bool>()), 1..12)
}

fn rows(layout: &[(bool, bool)]) -> Vec<ImportRow> {
    let mut rows = Vec::new();
    for (i, (balanced, _)) in layout.iter().enumerate() {
        let reference = format!("JE-{i}");
        let credit_amount = if *balanced { "25" } else { "20" };
        let mut debit = line(2 * i + 2, "5000", "25", "", "");
        let mut credit = line(2 * i + 3, "1000", "", credit_amount, "");
        debit.set("Reference", reference.as_str());
        credit.set("Reference", reference.as_str());
        rows.push(debit);
        rows.push(credit);
    }
    rows
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Committed groups are exactly the valid and selected ones.
    #[test]
    fn prop_commit_takes_valid_and_selected(layout in batch()) {
        let client = ClientId::new();
        let mut session =
            ReviewSession::new(client, EntityId::new(), rows(&layout), chart(client), catalog(client));
        for (i, (_, selected)) in layout.iter().enumerate() {
            session.set_selected(&GroupKey(format!("ref:je-{i}")), *selected).unwrap();
        }

        let batch = session.commit_batch();
        let expected: Vec<GroupKey> = layout
            .iter()
            .enumerate()
            .filter(|(_, (balanced, selected))| *balanced && *selected)
            .map(|(i, _)| GroupKey(format!("ref:je-{i}")))
            .collect();
        prop_assert_eq!(&batch.keys, &expected);
        prop_assert_eq!(batch.entries.len() + batch.skipped, layout.len());
        for entry in &batch.entries {
            prop_assert!(entry.balance().is_balanced);
        }
    }

    /// Select-all never picks an invalid group, whatever the filter.
    #[test]
    fn prop_select_all_never_selects_invalid(
        layout in batch(),
        filter in prop_oneof![
            Just(GroupFilter::All),
            Just(GroupFilter::Valid),
            Just(GroupFilter::Invalid),
            Just(GroupFilter::Selected),
        ],
    ) {
        let client = ClientId::new();
        let mut session =
            ReviewSession::new(client, EntityId::new(), rows(&layout), chart(client), catalog(client));
        session.select_all_visible(filter, true);
        for group in session.groups() {
            prop_assert!(!group.selected || group.is_valid());
        }
    }
}
