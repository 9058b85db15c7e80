//! Property-based tests for parent resolution.

use std::collections::HashMap;

use ledgerwise_shared::types::{AccountId, ClientId};
use proptest::prelude::*;

use super::index::ChartIndex;
use super::parents::resolve_parent_links;
use super::reconcile::ParentLink;
use super::types::{Account, AccountType};

fn accounts(n: usize) -> Vec<Account> {
    let client = ClientId::new();
    (0..n)
        .map(|i| Account {
            id: AccountId::new(),
            client_id: client,
            code: format!("{}", 1000 + i),
            name: format!("Account {i}"),
            account_type: AccountType::Asset,
            subtype: None,
            description: None,
            parent_id: None,
            is_active: true,
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Whatever parent codes an upload names, walking `parent_id` from any
    /// account ends within N steps.
    #[test]
    fn prop_parent_walk_terminates(
        n in 1usize..20,
        raw_links in prop::collection::vec((0usize..20, 0usize..20), 0..40),
    ) {
        let accounts = accounts(n);
        let chart = ChartIndex::new(accounts.clone());
        let links: Vec<ParentLink> = raw_links
            .iter()
            .enumerate()
            .map(|(row, (child, parent))| ParentLink {
                row: row + 2,
                account_id: accounts[child % n].id,
                account_code: accounts[child % n].code.clone(),
                parent_code: accounts[parent % n].code.clone(),
            })
            .collect();

        let resolution = resolve_parent_links(&chart, &links);

        let mut parents: HashMap<AccountId, Option<AccountId>> =
            accounts.iter().map(|a| (a.id, a.parent_id)).collect();
        for assignment in &resolution.assignments {
            parents.insert(assignment.account_id, Some(assignment.parent_id));
        }

        for account in &accounts {
            let mut steps = 0usize;
            let mut current = parents.get(&account.id).copied().flatten();
            while let Some(id) = current {
                steps += 1;
                prop_assert!(steps <= n, "parent walk from {} did not terminate", account.code);
                current = parents.get(&id).copied().flatten();
            }
        }
        prop_assert!(resolution.assignments.len() + resolution.warnings.len() <= links.len());
    }
}
