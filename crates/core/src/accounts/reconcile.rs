//! Diffing an uploaded chart of accounts against the existing one.
//!
//! The reconciler is pure: it takes the existing accounts plus the facts
//! that gate mutations (which accounts have lines, which have children) and
//! returns a [`ReconciliationPlan`]. Applying the plan is left to the
//! in-memory [`ChartOfAccounts`](super::ChartOfAccounts) or the database
//! repository, both of which run adds, updates, removals, and then parent
//! resolution.

use std::collections::{HashMap, HashSet};

use ledgerwise_shared::config::RemovalModeSetting;
use ledgerwise_shared::types::{AccountId, ClientId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::import_row::AccountImportRow;
use super::index::{ChartIndex, code_key};
use super::types::{Account, AccountUpdate};
use super::warning::{ImportWarning, WarningCode};
use crate::import::{ImportRow, resolve_field};

/// How existing accounts missing from the upload are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalMode {
    /// Mark them inactive.
    #[default]
    Deactivate,
    /// Delete them when they have no lines and no children.
    Delete,
}

impl From<RemovalModeSetting> for RemovalMode {
    fn from(setting: RemovalModeSetting) -> Self {
        match setting {
            RemovalModeSetting::Deactivate => Self::Deactivate,
            RemovalModeSetting::Delete => Self::Delete,
        }
    }
}

/// Derived facts that gate which mutations are allowed.
#[derive(Debug, Clone, Default)]
pub struct AccountFacts {
    /// Accounts referenced by at least one line.
    pub with_transactions: HashSet<AccountId>,
    /// Accounts that are the parent of at least one account.
    pub with_children: HashSet<AccountId>,
}

impl AccountFacts {
    /// Derives `with_children` from the accounts' parent links.
    #[must_use]
    pub fn from_accounts(accounts: &[Account], with_transactions: HashSet<AccountId>) -> Self {
        Self {
            with_transactions,
            with_children: accounts.iter().filter_map(|a| a.parent_id).collect(),
        }
    }

    /// True if any line references the account.
    #[must_use]
    pub fn has_transactions(&self, id: AccountId) -> bool {
        self.with_transactions.contains(&id)
    }

    /// True if any account names this one as parent.
    #[must_use]
    pub fn has_children(&self, id: AccountId) -> bool {
        self.with_children.contains(&id)
    }
}

/// One classified change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AccountChange {
    /// New account; its id is assigned up front so parents can be linked.
    Add {
        /// Source row.
        row: usize,
        /// Account to insert (parentless until the second pass).
        account: Account,
    },
    /// Existing account with field changes.
    Update {
        /// Source row.
        row: usize,
        /// Account id.
        id: AccountId,
        /// Account code before the update.
        code: String,
        /// Fields to change.
        changes: AccountUpdate,
    },
    /// Existing account matching its row exactly.
    Unchanged {
        /// Source row.
        row: usize,
        /// Account id.
        id: AccountId,
    },
    /// Existing account absent from the upload, to mark inactive.
    Deactivate {
        /// Account id.
        id: AccountId,
        /// Account code.
        code: String,
    },
    /// Existing account absent from the upload, to delete.
    Delete {
        /// Account id.
        id: AccountId,
        /// Account code.
        code: String,
    },
}

/// Parent reference to resolve once every add is in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentLink {
    /// Source row.
    pub row: usize,
    /// Child account.
    pub account_id: AccountId,
    /// Child code, for warnings.
    pub account_code: String,
    /// Parent code as written in the upload.
    pub parent_code: String,
}

/// Result of reconciling an upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationPlan {
    /// Classified changes in row order, removals last.
    pub changes: Vec<AccountChange>,
    /// Parent references for the second pass.
    pub parent_links: Vec<ParentLink>,
    /// Itemized warnings.
    pub warnings: Vec<ImportWarning>,
}

impl ReconciliationPlan {
    /// Accounts to insert.
    pub fn adds(&self) -> impl Iterator<Item = &Account> {
        self.changes.iter().filter_map(|c| match c {
            AccountChange::Add { account, .. } => Some(account),
            _ => None,
        })
    }

    /// Updates to apply.
    pub fn updates(&self) -> impl Iterator<Item = (AccountId, &AccountUpdate)> {
        self.changes.iter().filter_map(|c| match c {
            AccountChange::Update { id, changes, .. } => Some((*id, changes)),
            _ => None,
        })
    }

    /// Accounts to deactivate.
    pub fn deactivations(&self) -> impl Iterator<Item = AccountId> + '_ {
        self.changes.iter().filter_map(|c| match c {
            AccountChange::Deactivate { id, .. } => Some(*id),
            _ => None,
        })
    }

    /// Accounts to delete.
    pub fn deletions(&self) -> impl Iterator<Item = AccountId> + '_ {
        self.changes.iter().filter_map(|c| match c {
            AccountChange::Delete { id, .. } => Some(*id),
            _ => None,
        })
    }

    /// Count of unchanged rows.
    #[must_use]
    pub fn unchanged_count(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, AccountChange::Unchanged { .. }))
            .count()
    }
}

/// Stateless chart-of-accounts reconciler.
pub struct ChartReconciler;

impl ChartReconciler {
    /// Classifies every uploaded row and every unmatched existing account.
    ///
    /// Bad rows are skipped with a warning; the batch never aborts.
    pub fn reconcile(
        client_id: ClientId,
        existing: &[Account],
        rows: &[ImportRow],
        facts: &AccountFacts,
        mode: RemovalMode,
    ) -> ReconciliationPlan {
        let index = ChartIndex::new(existing.to_vec());
        let mut plan = ReconciliationPlan::default();
        let mut matched: HashSet<AccountId> = HashSet::new();
        let mut listed: HashSet<AccountId> = HashSet::new();
        let mut seen_codes: HashMap<String, usize> = HashMap::new();

        for raw in rows {
            // Skipped rows still protect the account they name from removal.
            if let Some(named) = Self::named_account(raw, &index) {
                listed.insert(named.id);
            }
            let row = match AccountImportRow::from_row(raw) {
                Ok(row) => row,
                Err(warning) => {
                    debug!(row = raw.row_number, reason = %warning.message, "Skipping account row");
                    plan.warnings.push(warning);
                    continue;
                }
            };

            let key = code_key(&row.code);
            if let Some(first) = seen_codes.get(&key) {
                plan.warnings.push(ImportWarning::row(
                    row.row_number,
                    Some(row.code.as_str()),
                    WarningCode::DuplicateCode,
                    format!("Row skipped: code {} already appears on row {first}", row.code),
                ));
                continue;
            }
            seen_codes.insert(key, row.row_number);

            let existing_match = row
                .id
                .and_then(|id| index.by_id(id))
                .or_else(|| index.by_code(&row.code));

            match existing_match {
                None => {
                    let account = Account {
                        id: AccountId::new(),
                        client_id,
                        code: row.code.clone(),
                        name: row.name.clone(),
                        account_type: row.account_type,
                        subtype: row.subtype.clone(),
                        description: row.description.clone(),
                        parent_id: None,
                        is_active: row.is_active.unwrap_or(true),
                    };
                    if let Some(parent_code) = &row.parent_code {
                        plan.parent_links.push(ParentLink {
                            row: row.row_number,
                            account_id: account.id,
                            account_code: account.code.clone(),
                            parent_code: parent_code.clone(),
                        });
                    }
                    plan.changes.push(AccountChange::Add {
                        row: row.row_number,
                        account,
                    });
                }
                Some(current) => {
                    if !matched.insert(current.id) {
                        plan.warnings.push(ImportWarning::row(
                            row.row_number,
                            Some(row.code.as_str()),
                            WarningCode::DuplicateCode,
                            format!("Row skipped: account {} is already matched by another row", current.code),
                        ));
                        continue;
                    }
                    let changes = Self::diff(current, &row, &index, facts, &mut plan.warnings);
                    if let Some(parent_code) = &row.parent_code {
                        plan.parent_links.push(ParentLink {
                            row: row.row_number,
                            account_id: current.id,
                            account_code: current.code.clone(),
                            parent_code: parent_code.clone(),
                        });
                    }
                    plan.changes.push(if changes.is_empty() {
                        AccountChange::Unchanged {
                            row: row.row_number,
                            id: current.id,
                        }
                    } else {
                        AccountChange::Update {
                            row: row.row_number,
                            id: current.id,
                            code: current.code.clone(),
                            changes,
                        }
                    });
                }
            }
        }

        for account in existing {
            if matched.contains(&account.id) || listed.contains(&account.id) || !account.is_active {
                continue;
            }
            plan.changes.push(Self::removal(account, facts, mode, &mut plan.warnings));
        }

        debug!(
            changes = plan.changes.len(),
            parent_links = plan.parent_links.len(),
            warnings = plan.warnings.len(),
            "Chart reconciled"
        );
        plan
    }

    /// Existing account a raw row refers to, by id and then by code.
    fn named_account<'a>(raw: &ImportRow, index: &'a ChartIndex) -> Option<&'a Account> {
        resolve_field(raw, "accountId")
            .and_then(|v| v.parse().ok())
            .and_then(|id| index.by_id(id))
            .or_else(|| resolve_field(raw, "accountCode").and_then(|code| index.by_code(code)))
    }

    fn diff(
        current: &Account,
        row: &AccountImportRow,
        index: &ChartIndex,
        facts: &AccountFacts,
        warnings: &mut Vec<ImportWarning>,
    ) -> AccountUpdate {
        let locked = facts.has_transactions(current.id);
        let mut changes = AccountUpdate::default();

        if row.name != current.name {
            changes.name = Some(row.name.clone());
        }
        if row.description.is_some() && row.description != current.description {
            changes.description.clone_from(&row.description);
        }
        if let Some(active) = row.is_active.filter(|a| *a != current.is_active) {
            changes.is_active = Some(active);
        }

        if row.account_type != current.account_type {
            if locked {
                warn!(account = %current.code, "Type change blocked: account has transactions");
                warnings.push(ImportWarning::row(
                    row.row_number,
                    Some(current.code.as_str()),
                    WarningCode::TypeChangeBlocked,
                    format!(
                        "Type of {} kept as {}: account has transactions",
                        current.code, current.account_type
                    ),
                ));
            } else {
                changes.account_type = Some(row.account_type);
            }
        }

        if row.subtype.is_some() && row.subtype != current.subtype {
            if locked {
                warnings.push(ImportWarning::row(
                    row.row_number,
                    Some(current.code.as_str()),
                    WarningCode::FieldChangeBlocked,
                    format!("Subtype of {} kept: account has transactions", current.code),
                ));
            } else {
                changes.subtype.clone_from(&row.subtype);
            }
        }

        if row.code != current.code {
            let taken = index
                .by_code(&row.code)
                .is_some_and(|other| other.id != current.id);
            if taken {
                warnings.push(ImportWarning::row(
                    row.row_number,
                    Some(current.code.as_str()),
                    WarningCode::DuplicateCode,
                    format!("Code of {} kept: {} belongs to another account", current.code, row.code),
                ));
            } else if locked {
                warnings.push(ImportWarning::row(
                    row.row_number,
                    Some(current.code.as_str()),
                    WarningCode::FieldChangeBlocked,
                    format!("Code of {} kept: account has transactions", current.code),
                ));
            } else {
                changes.code = Some(row.code.clone());
            }
        }

        changes
    }

    fn removal(
        account: &Account,
        facts: &AccountFacts,
        mode: RemovalMode,
        warnings: &mut Vec<ImportWarning>,
    ) -> AccountChange {
        let deactivate = AccountChange::Deactivate {
            id: account.id,
            code: account.code.clone(),
        };
        if mode == RemovalMode::Deactivate {
            return deactivate;
        }

        let reason = if facts.has_transactions(account.id) {
            Some("it has transactions")
        } else if facts.has_children(account.id) {
            Some("it has child accounts")
        } else {
            None
        };
        match reason {
            Some(reason) => {
                warnings.push(ImportWarning::account(
                    &account.code,
                    WarningCode::DeleteDowngraded,
                    format!("{} deactivated instead of deleted: {reason}", account.code),
                ));
                deactivate
            }
            None => AccountChange::Delete {
                id: account.id,
                code: account.code.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::types::AccountType;

    fn account(client: ClientId, code: &str, name: &str, account_type: AccountType) -> Account {
        Account {
            id: AccountId::new(),
            client_id: client,
            code: code.into(),
            name: name.into(),
            account_type,
            subtype: None,
            description: None,
            parent_id: None,
            is_active: true,
        }
    }

    fn row(n: usize, cells: &[(&str, &str)]) -> ImportRow {
        ImportRow::new(n, cells.iter().copied())
    }

    #[test]
    fn test_classifies_add_update_unchanged() {
        let client = ClientId::new();
        let cash = account(client, "1000", "Cash", AccountType::Asset);
        let ar = account(client, "1200", "Receivables", AccountType::Asset);
        let rows = vec![
            row(2, &[("code", "1000"), ("name", "Cash"), ("type", "asset")]),
            row(3, &[("code", "1200"), ("name", "Trade Receivables"), ("type", "asset")]),
            row(4, &[("code", "4000"), ("name", "Sales"), ("type", "revenue")]),
        ];
        let plan = ChartReconciler::reconcile(
            client,
            &[cash.clone(), ar.clone()],
            &rows,
            &AccountFacts::default(),
            RemovalMode::Deactivate,
        );

        assert!(matches!(plan.changes[0], AccountChange::Unchanged { id, .. } if id == cash.id));
        assert!(matches!(&plan.changes[1], AccountChange::Update { id, changes, .. }
            if *id == ar.id && changes.name.as_deref() == Some("Trade Receivables")));
        assert!(matches!(&plan.changes[2], AccountChange::Add { account, .. } if account.code == "4000"));
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn test_code_match_is_case_insensitive() {
        let client = ClientId::new();
        let existing = account(client, "CASH-01", "Cash", AccountType::Asset);
        let rows = vec![row(2, &[("code", "cash-01"), ("name", "Cash"), ("type", "asset")])];
        let plan = ChartReconciler::reconcile(
            client,
            &[existing.clone()],
            &rows,
            &AccountFacts::default(),
            RemovalMode::Deactivate,
        );
        let AccountChange::Update { changes, .. } = &plan.changes[0] else {
            panic!("expected cosmetic code update");
        };
        assert_eq!(changes.code.as_deref(), Some("cash-01"));
    }

    #[test]
    fn test_type_change_blocked_when_account_has_transactions() {
        let client = ClientId::new();
        let existing = Account {
            description: Some("Old".into()),
            ..account(client, "1000", "Cash", AccountType::Asset)
        };
        let facts = AccountFacts {
            with_transactions: HashSet::from([existing.id]),
            ..Default::default()
        };
        let rows = vec![row(
            2,
            &[
                ("Account Code", "1000"),
                ("Account Name", "Cash on Hand"),
                ("Account Type", "expense"),
                ("Description", "Till and safe"),
            ],
        )];
        let plan = ChartReconciler::reconcile(client, &[existing.clone()], &rows, &facts, RemovalMode::Deactivate);

        let AccountChange::Update { changes, .. } = &plan.changes[0] else {
            panic!("expected update");
        };
        assert_eq!(changes.account_type, None);
        assert_eq!(changes.name.as_deref(), Some("Cash on Hand"));
        assert_eq!(changes.description.as_deref(), Some("Till and safe"));
        assert_eq!(plan.warnings.len(), 1);
        assert_eq!(plan.warnings[0].code, WarningCode::TypeChangeBlocked);
        assert_eq!(plan.warnings[0].row, Some(2));
    }

    #[test]
    fn test_missing_accounts_deactivated_by_default() {
        let client = ClientId::new();
        let old = account(client, "1999", "Suspense", AccountType::Asset);
        let inactive = Account {
            is_active: false,
            ..account(client, "1998", "Closed", AccountType::Asset)
        };
        let plan = ChartReconciler::reconcile(
            client,
            &[old.clone(), inactive],
            &[],
            &AccountFacts::default(),
            RemovalMode::Deactivate,
        );
        assert_eq!(plan.changes, vec![AccountChange::Deactivate { id: old.id, code: "1999".into() }]);
    }

    #[test]
    fn test_strict_delete_downgrades() {
        let client = ClientId::new();
        let used = account(client, "1000", "Cash", AccountType::Asset);
        let parent = account(client, "1500", "Fixed Assets", AccountType::Asset);
        let child = Account {
            parent_id: Some(parent.id),
            ..account(client, "1510", "Equipment", AccountType::Asset)
        };
        let unused = account(client, "1900", "Unused", AccountType::Asset);
        let existing = vec![used.clone(), parent.clone(), child.clone(), unused.clone()];
        let facts = AccountFacts::from_accounts(&existing, HashSet::from([used.id]));

        let plan = ChartReconciler::reconcile(client, &existing, &[], &facts, RemovalMode::Delete);

        assert_eq!(plan.deactivations().collect::<Vec<_>>(), vec![used.id, parent.id]);
        assert_eq!(plan.deletions().collect::<Vec<_>>(), vec![child.id, unused.id]);
        assert_eq!(plan.warnings.len(), 2);
        assert!(plan.warnings.iter().all(|w| w.code == WarningCode::DeleteDowngraded));
    }

    #[test]
    fn test_bad_rows_skipped_not_fatal() {
        let client = ClientId::new();
        let rows = vec![
            row(2, &[("code", ""), ("name", "Nameless"), ("type", "asset")]),
            row(3, &[("code", "2000"), ("name", "AP"), ("type", "debt")]),
            row(4, &[("code", "3000"), ("name", "Equity"), ("type", "equity")]),
            row(5, &[("code", "3000"), ("name", "Dup"), ("type", "equity")]),
        ];
        let plan = ChartReconciler::reconcile(client, &[], &rows, &AccountFacts::default(), RemovalMode::Deactivate);

        assert_eq!(plan.adds().count(), 1);
        let codes: Vec<_> = plan.warnings.iter().map(|w| w.code).collect();
        assert_eq!(
            codes,
            vec![
                WarningCode::MissingRequiredField,
                WarningCode::InvalidAccountType,
                WarningCode::DuplicateCode,
            ]
        );
    }

    #[rstest::rstest]
    #[case(RemovalMode::Deactivate)]
    #[case(RemovalMode::Delete)]
    fn test_skipped_row_keeps_its_account(#[case] mode: RemovalMode) {
        let client = ClientId::new();
        let cash = account(client, "1000", "Cash", AccountType::Asset);
        let bank = account(client, "1100", "Bank", AccountType::Asset);
        let rows = vec![
            row(2, &[("code", "1000"), ("name", "Cash"), ("type", "bank")]),
            row(3, &[("code", "1100"), ("name", "Bank"), ("type", "asset")]),
            row(4, &[("code", "1100"), ("name", "Bank again"), ("type", "asset")]),
        ];
        let plan = ChartReconciler::reconcile(
            client,
            &[cash.clone(), bank.clone()],
            &rows,
            &AccountFacts::default(),
            mode,
        );

        assert_eq!(plan.deletions().count(), 0);
        assert_eq!(plan.deactivations().count(), 0);
        assert!(matches!(
            plan.changes.as_slice(),
            [AccountChange::Unchanged { id, .. }] if *id == bank.id
        ));
        let codes: Vec<_> = plan.warnings.iter().map(|w| w.code).collect();
        assert_eq!(codes, vec![WarningCode::InvalidAccountType, WarningCode::DuplicateCode]);
    }

    #[test]
    fn test_unlisted_account_still_removed_beside_skipped_row() {
        let client = ClientId::new();
        let cash = account(client, "1000", "Cash", AccountType::Asset);
        let old = account(client, "1999", "Suspense", AccountType::Asset);
        let rows = vec![row(2, &[("code", "1000"), ("name", "Cash"), ("type", "bank")])];
        let plan = ChartReconciler::reconcile(
            client,
            &[cash, old.clone()],
            &rows,
            &AccountFacts::default(),
            RemovalMode::Delete,
        );

        assert_eq!(plan.deletions().collect::<Vec<_>>(), vec![old.id]);
    }

    #[test]
    fn test_removal_mode_from_setting() {
        assert_eq!(RemovalMode::from(RemovalModeSetting::Delete), RemovalMode::Delete);
        assert_eq!(RemovalMode::default(), RemovalMode::Deactivate);
    }
}
