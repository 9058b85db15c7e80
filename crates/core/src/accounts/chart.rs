//! In-memory chart of accounts for dry runs and tests.
//!
//! The database repository applies the same [`ReconciliationPlan`] inside
//! one transaction; this type mirrors that order without persistence.

use std::collections::{HashMap, HashSet};

use ledgerwise_shared::types::{AccountId, ClientId};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::AccountError;
use super::index::{ChartIndex, code_key};
use super::parents::resolve_parent_links;
use super::reconcile::{AccountFacts, ChartReconciler, ParentLink, ReconciliationPlan, RemovalMode};
use super::types::{Account, AccountUpdate};
use super::warning::{ImportWarning, WarningCode};
use crate::import::ImportRow;

/// Counts and warnings from one import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Accounts inserted.
    pub added: usize,
    /// Accounts updated.
    pub updated: usize,
    /// Rows matching their account exactly.
    pub unchanged: usize,
    /// Accounts marked inactive.
    pub deactivated: usize,
    /// Accounts deleted.
    pub deleted: usize,
    /// Parent links set.
    pub parents_linked: usize,
    /// Itemized warnings from every pass.
    pub warnings: Vec<ImportWarning>,
}

impl ImportSummary {
    /// Counts the plan's changes; parent links are filled in by the caller.
    #[must_use]
    pub fn from_plan(plan: &ReconciliationPlan) -> Self {
        Self {
            added: plan.adds().count(),
            updated: plan.updates().count(),
            unchanged: plan.unchanged_count(),
            deactivated: plan.deactivations().count(),
            deleted: plan.deletions().count(),
            parents_linked: 0,
            warnings: plan.warnings.clone(),
        }
    }
}

/// A client's chart of accounts with line counts per account.
#[derive(Debug, Clone)]
pub struct ChartOfAccounts {
    client_id: ClientId,
    accounts: Vec<Account>,
    line_counts: HashMap<AccountId, usize>,
}

impl ChartOfAccounts {
    /// Creates a chart.
    #[must_use]
    pub fn new(client_id: ClientId, accounts: Vec<Account>) -> Self {
        Self {
            client_id,
            accounts,
            line_counts: HashMap::new(),
        }
    }

    /// Records that `count` lines reference the account.
    pub fn record_lines(&mut self, account_id: AccountId, count: usize) {
        *self.line_counts.entry(account_id).or_default() += count;
    }

    /// Accounts in insertion order.
    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Lookup index over the current accounts.
    #[must_use]
    pub fn index(&self) -> ChartIndex {
        ChartIndex::new(self.accounts.clone())
    }

    /// Facts gating mutations.
    #[must_use]
    pub fn facts(&self) -> AccountFacts {
        let with_transactions: HashSet<AccountId> = self
            .line_counts
            .iter()
            .filter(|(_, n)| **n > 0)
            .map(|(id, _)| *id)
            .collect();
        AccountFacts::from_accounts(&self.accounts, with_transactions)
    }

    /// Reconciles `rows` and applies the resulting plan.
    pub fn import(&mut self, rows: &[ImportRow], mode: RemovalMode) -> ImportSummary {
        let plan = ChartReconciler::reconcile(self.client_id, &self.accounts, rows, &self.facts(), mode);
        self.apply(&plan)
    }

    /// Applies a plan: adds, updates, removals, then parent resolution.
    pub fn apply(&mut self, plan: &ReconciliationPlan) -> ImportSummary {
        let mut summary = ImportSummary::from_plan(plan);

        self.accounts.extend(plan.adds().cloned());
        for (id, changes) in plan.updates() {
            if let Some(account) = self.accounts.iter_mut().find(|a| a.id == id) {
                changes.apply_to(account);
            }
        }
        let deactivate: HashSet<AccountId> = plan.deactivations().collect();
        for account in self.accounts.iter_mut().filter(|a| deactivate.contains(&a.id)) {
            account.is_active = false;
        }
        let delete: HashSet<AccountId> = plan.deletions().collect();
        self.accounts.retain(|a| !delete.contains(&a.id));

        let resolution = resolve_parent_links(&self.index(), &plan.parent_links);
        for assignment in &resolution.assignments {
            if let Some(account) = self.accounts.iter_mut().find(|a| a.id == assignment.account_id) {
                account.parent_id = Some(assignment.parent_id);
            }
        }
        summary.parents_linked = resolution.assignments.len();
        summary.warnings.extend(resolution.warnings);

        info!(
            client_id = %self.client_id,
            added = summary.added,
            updated = summary.updated,
            deactivated = summary.deactivated,
            deleted = summary.deleted,
            parents_linked = summary.parents_linked,
            warnings = summary.warnings.len(),
            "Chart of accounts import applied"
        );
        summary
    }

    /// Updates one account, enforcing the has-transactions rules.
    ///
    /// # Errors
    ///
    /// Fails for unknown accounts, duplicate codes, and frozen-field changes
    /// on accounts with lines.
    pub fn update_account(&mut self, id: AccountId, update: &AccountUpdate) -> Result<&Account, AccountError> {
        let facts = self.facts();
        let index = self.index();
        let current = index.by_id(id).ok_or(AccountError::NotFound(id))?;

        if let Some(code) = &update.code {
            if index.by_code(code).is_some_and(|other| other.id != id) {
                return Err(AccountError::DuplicateCode(code.clone()));
            }
        }
        if facts.has_transactions(id) {
            if update.account_type.is_some_and(|t| t != current.account_type) {
                return Err(AccountError::TypeChangeNotAllowed(current.code.clone()));
            }
            if update.code.as_ref().is_some_and(|c| *c != current.code) {
                return Err(AccountError::RestrictedFieldChange {
                    code: current.code.clone(),
                    field: "code",
                });
            }
            if update.subtype.is_some() && update.subtype != current.subtype {
                return Err(AccountError::RestrictedFieldChange {
                    code: current.code.clone(),
                    field: "subtype",
                });
            }
        }

        let account = self
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AccountError::NotFound(id))?;
        update.apply_to(account);
        Ok(account)
    }

    /// Sets or clears one account's parent, rejecting cycles.
    ///
    /// # Errors
    ///
    /// Fails for unknown accounts and for self or circular parents.
    pub fn set_parent(&mut self, id: AccountId, parent_code: Option<&str>) -> Result<(), AccountError> {
        let index = self.index();
        let child = index.by_id(id).ok_or(AccountError::NotFound(id))?;
        let parent_id = match parent_code {
            None => None,
            Some(code) => {
                let links = [ParentLink {
                    row: 0,
                    account_id: id,
                    account_code: child.code.clone(),
                    parent_code: code.to_string(),
                }];
                let resolution = resolve_parent_links(&index, &links);
                if let Some(warning) = resolution.warnings.first() {
                    return Err(match warning.code {
                        WarningCode::ParentNotFound => AccountError::ParentNotFound(code.to_string()),
                        _ => AccountError::CircularParent(child.code.clone()),
                    });
                }
                index.by_code(code).map(|p| p.id)
            }
        };
        if let Some(account) = self.accounts.iter_mut().find(|a| a.id == id) {
            account.parent_id = parent_id;
        }
        Ok(())
    }

    /// Deletes one account.
    ///
    /// # Errors
    ///
    /// Accounts with lines or children cannot be deleted.
    pub fn delete_account(&mut self, id: AccountId) -> Result<Account, AccountError> {
        let facts = self.facts();
        let pos = self
            .accounts
            .iter()
            .position(|a| a.id == id)
            .ok_or(AccountError::NotFound(id))?;
        let code = self.accounts[pos].code.clone();
        if facts.has_transactions(id) {
            return Err(AccountError::HasTransactions(code));
        }
        if facts.has_children(id) {
            return Err(AccountError::HasChildren(code));
        }
        Ok(self.accounts.remove(pos))
    }

    /// Account by code, ignoring case.
    #[must_use]
    pub fn find_by_code(&self, code: &str) -> Option<&Account> {
        let key = code_key(code);
        self.accounts.iter().find(|a| code_key(&a.code) == key)
    }
}
