//! Shared builders for review tests.

use ledgerwise_shared::types::{AccountId, ClientId, DimensionId, DimensionValueId};

use crate::accounts::{Account, AccountType, ChartIndex};
use crate::dimension::{Dimension, DimensionCatalog, DimensionValue};
use crate::import::ImportRow;

pub(crate) fn account(client: ClientId, code: &str, name: &str, kind: AccountType) -> Account {
    Account {
        id: AccountId::new(),
        client_id: client,
        code: code.to_string(),
        name: name.to_string(),
        account_type: kind,
        subtype: None,
        description: None,
        parent_id: None,
        is_active: true,
    }
}

pub(crate) fn chart(client: ClientId) -> ChartIndex {
    let mut retired = account(client, "1900", "Old Clearing", AccountType::Asset);
    retired.is_active = false;
    ChartIndex::new(vec![
        account(client, "1000", "Cash", AccountType::Asset),
        account(client, "2000", "Accounts Payable", AccountType::Liability),
        account(client, "4000", "Sales", AccountType::Revenue),
        account(client, "5000", "Rent", AccountType::Expense),
        retired,
    ])
}

pub(crate) fn catalog(client: ClientId) -> DimensionCatalog {
    let department = Dimension {
        id: DimensionId::new(),
        client_id: client,
        code: "DEPT".into(),
        name: "Department".into(),
        is_active: true,
    };
    let values = ["Sales", "Engineering"]
        .into_iter()
        .map(|name| DimensionValue {
            id: DimensionValueId::new(),
            dimension_id: department.id,
            code: None,
            name: name.into(),
            is_active: true,
        })
        .collect();
    DimensionCatalog::new(vec![department], values)
}

/// A journal row with reference `JE-1`.
pub(crate) fn line(n: usize, account: &str, debit: &str, credit: &str, department: &str) -> ImportRow {
    ImportRow::new(
        n,
        [
            ("Date", "2026-01-31"),
            ("Reference", "JE-1"),
            ("Description", "Office rent"),
            ("Account Code", account),
            ("Debit", debit),
            ("Credit", credit),
            ("Department", department),
        ],
    )
}
