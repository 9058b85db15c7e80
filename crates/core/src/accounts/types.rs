//! Chart of accounts domain types.

use std::fmt;

use ledgerwise_shared::types::{AccountId, ClientId};
use serde::{Deserialize, Serialize};

use crate::journal::EntryType;

/// Account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Assets (debit-normal).
    Asset,
    /// Liabilities (credit-normal).
    Liability,
    /// Equity (credit-normal).
    Equity,
    /// Revenue (credit-normal).
    Revenue,
    /// Expenses (debit-normal).
    Expense,
}

impl AccountType {
    /// Parses common spellings case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asset" | "assets" => Some(Self::Asset),
            "liability" | "liabilities" => Some(Self::Liability),
            "equity" | "capital" => Some(Self::Equity),
            "revenue" | "revenues" | "income" => Some(Self::Revenue),
            "expense" | "expenses" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Returns the string representation of the type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }

    /// Side that increases the account.
    #[must_use]
    pub fn normal_balance(&self) -> EntryType {
        match self {
            Self::Asset | Self::Expense => EntryType::Debit,
            Self::Liability | Self::Equity | Self::Revenue => EntryType::Credit,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A chart of accounts entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account id.
    pub id: AccountId,
    /// Owning client.
    pub client_id: ClientId,
    /// Code, unique per client ignoring case.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Classification.
    pub account_type: AccountType,
    /// Optional finer classification.
    pub subtype: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Parent account in the same client.
    pub parent_id: Option<AccountId>,
    /// Inactive accounts stay for history but take no new lines.
    pub is_active: bool,
}

/// Field changes to an existing account. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUpdate {
    /// New code.
    pub code: Option<String>,
    /// New name.
    pub name: Option<String>,
    /// New type.
    pub account_type: Option<AccountType>,
    /// New subtype.
    pub subtype: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
}

impl AccountUpdate {
    /// True if nothing would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// True if the update touches fields frozen once lines exist.
    #[must_use]
    pub fn touches_restricted_fields(&self) -> bool {
        self.code.is_some() || self.account_type.is_some() || self.subtype.is_some()
    }

    /// Applies the update in place.
    pub fn apply_to(&self, account: &mut Account) {
        if let Some(code) = &self.code {
            account.code.clone_from(code);
        }
        if let Some(name) = &self.name {
            account.name.clone_from(name);
        }
        if let Some(account_type) = self.account_type {
            account.account_type = account_type;
        }
        if let Some(subtype) = &self.subtype {
            account.subtype = Some(subtype.clone());
        }
        if let Some(description) = &self.description {
            account.description = Some(description.clone());
        }
        if let Some(is_active) = self.is_active {
            account.is_active = is_active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Asset", Some(AccountType::Asset))]
    #[case(" ASSETS ", Some(AccountType::Asset))]
    #[case("liabilities", Some(AccountType::Liability))]
    #[case("Income", Some(AccountType::Revenue))]
    #[case("expenses", Some(AccountType::Expense))]
    #[case("equity", Some(AccountType::Equity))]
    #[case("bank", None)]
    fn test_parse_account_type(#[case] raw: &str, #[case] expected: Option<AccountType>) {
        assert_eq!(AccountType::parse(raw), expected);
    }

    #[test]
    fn test_normal_balance() {
        assert_eq!(AccountType::Asset.normal_balance(), EntryType::Debit);
        assert_eq!(AccountType::Revenue.normal_balance(), EntryType::Credit);
    }

    #[test]
    fn test_update_restricted_fields() {
        let update = AccountUpdate {
            name: Some("Cash".into()),
            ..Default::default()
        };
        assert!(!update.touches_restricted_fields());
        assert!(!update.is_empty());
        assert!(AccountUpdate::default().is_empty());
    }
}
