//! Case-insensitive account lookup.

use std::collections::HashMap;

use ledgerwise_shared::types::AccountId;

use super::types::Account;
use crate::journal::AccountRef;

/// Normalized lookup key for an account code.
#[must_use]
pub fn code_key(code: &str) -> String {
    code.trim().to_lowercase()
}

/// Lookup of a client's accounts by id and by code.
#[derive(Debug, Clone, Default)]
pub struct ChartIndex {
    accounts: Vec<Account>,
    by_code: HashMap<String, usize>,
    by_id: HashMap<AccountId, usize>,
}

impl ChartIndex {
    /// Builds the index. On duplicate codes the first account wins.
    #[must_use]
    pub fn new(accounts: Vec<Account>) -> Self {
        let mut by_code = HashMap::with_capacity(accounts.len());
        let mut by_id = HashMap::with_capacity(accounts.len());
        for (idx, account) in accounts.iter().enumerate() {
            by_code.entry(code_key(&account.code)).or_insert(idx);
            by_id.insert(account.id, idx);
        }
        Self {
            accounts,
            by_code,
            by_id,
        }
    }

    /// Account by code, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn by_code(&self, code: &str) -> Option<&Account> {
        self.by_code.get(&code_key(code)).map(|&i| &self.accounts[i])
    }

    /// Account by id.
    #[must_use]
    pub fn by_id(&self, id: AccountId) -> Option<&Account> {
        self.by_id.get(&id).map(|&i| &self.accounts[i])
    }

    /// Resolves a line's account reference.
    #[must_use]
    pub fn resolve(&self, account: &AccountRef) -> Option<&Account> {
        match account {
            AccountRef::Id(id) => self.by_id(*id),
            AccountRef::Code(code) => self.by_code(code),
        }
    }

    /// All accounts in load order.
    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// True if the chart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Consumes the index, returning the accounts.
    #[must_use]
    pub fn into_accounts(self) -> Vec<Account> {
        self.accounts
    }
}
