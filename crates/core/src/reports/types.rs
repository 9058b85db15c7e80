//! Report data types.

use chrono::NaiveDate;
use ledgerwise_shared::types::{AccountId, ConsolidationGroupId, EntityId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ReportError;
use crate::accounts::{Account, AccountType};
use crate::dimension::DimensionTag;
use crate::journal::{EntryType, LineAmount};

/// Reporting window. An open start means "since inception".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    /// First day included.
    pub start: Option<NaiveDate>,
    /// Last day included.
    pub end: NaiveDate,
}

impl ReportPeriod {
    /// Creates a period.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is after `end`.
    pub fn new(start: Option<NaiveDate>, end: NaiveDate) -> Result<Self, ReportError> {
        if let Some(start) = start {
            if start > end {
                return Err(ReportError::InvalidDateRange { start, end });
            }
        }
        Ok(Self { start, end })
    }

    /// Everything up to and including `end`.
    #[must_use]
    pub const fn as_of(end: NaiveDate) -> Self {
        Self { start: None, end }
    }

    /// True if `date` falls in the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && date <= self.end
    }
}

/// A line of a posted entry, as reports consume it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostedLine {
    /// Account posted to.
    pub account_id: AccountId,
    /// Entity that owns the entry.
    pub entity_id: EntityId,
    /// Entry date.
    pub entry_date: NaiveDate,
    /// Signed amount.
    pub amount: LineAmount,
    /// Dimension tags on the line.
    pub dimensions: Vec<DimensionTag>,
}

/// Posted debit and credit totals for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTotals {
    /// Account.
    pub account_id: AccountId,
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
}

/// Account balance for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Account subtype (`current_asset`, `cost_of_goods_sold`, ...).
    pub account_subtype: Option<String>,
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
    /// Net balance on the account's normal side.
    pub balance: Decimal,
}

impl AccountBalance {
    /// Balance of `account` from its debit and credit totals.
    ///
    /// Debit-normal accounts report `debit - credit`, credit-normal
    /// accounts `credit - debit`, so a positive balance is the usual one.
    #[must_use]
    pub fn new(account: &Account, total_debit: Decimal, total_credit: Decimal) -> Self {
        let balance = match account.account_type.normal_balance() {
            EntryType::Debit => total_debit - total_credit,
            EntryType::Credit => total_credit - total_debit,
        };
        Self {
            account_id: account.id,
            code: account.code.clone(),
            name: account.name.clone(),
            account_type: account.account_type,
            account_subtype: account.subtype.clone(),
            total_debit,
            total_credit,
            balance,
        }
    }

    /// Net debit, shown in the trial balance debit column.
    #[must_use]
    pub fn debit_balance(&self) -> Decimal {
        (self.total_debit - self.total_credit).max(Decimal::ZERO)
    }

    /// Net credit, shown in the trial balance credit column.
    #[must_use]
    pub fn credit_balance(&self) -> Decimal {
        (self.total_credit - self.total_debit).max(Decimal::ZERO)
    }
}

/// Trial balance report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// As of date.
    pub as_of: NaiveDate,
    /// Account balances, by code.
    pub accounts: Vec<AccountBalance>,
    /// Totals.
    pub totals: TrialBalanceTotals,
}

/// Trial balance totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Total debit.
    pub total_debit: Decimal,
    /// Total credit.
    pub total_credit: Decimal,
    /// Whether debits equal credits within tolerance.
    pub is_balanced: bool,
}

/// Balance sheet section (assets, liabilities, equity).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts in this section.
    pub accounts: Vec<AccountBalance>,
    /// Accounts grouped by subtype, in first-seen order.
    pub subsections: Vec<BalanceSheetSubsection>,
}

/// Balance sheet subsection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetSubsection {
    /// Subtype name.
    pub name: String,
    /// Subsection total.
    pub total: Decimal,
    /// Accounts in this subsection.
    pub accounts: Vec<AccountBalance>,
}

/// Balance sheet report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// As of date.
    pub as_of: NaiveDate,
    /// Assets section.
    pub assets: BalanceSheetSection,
    /// Liabilities section.
    pub liabilities: BalanceSheetSection,
    /// Equity section, excluding current earnings.
    pub equity: BalanceSheetSection,
    /// Revenue less expenses not yet closed to equity.
    pub current_earnings: Decimal,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Total equity, including current earnings.
    pub total_equity: Decimal,
    /// Liabilities plus equity.
    pub liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities plus equity within tolerance.
    pub is_balanced: bool,
}

/// Income statement section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatementSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts in this section.
    pub accounts: Vec<AccountBalance>,
}

/// Income statement report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatementReport {
    /// Period covered.
    pub period: ReportPeriod,
    /// Revenue section.
    pub revenue: IncomeStatementSection,
    /// Cost of goods sold section.
    pub cost_of_goods_sold: IncomeStatementSection,
    /// Gross profit (revenue - COGS).
    pub gross_profit: Decimal,
    /// Operating expenses section.
    pub operating_expenses: IncomeStatementSection,
    /// Operating income (gross profit - operating expenses).
    pub operating_income: Decimal,
    /// Remaining expenses.
    pub other_expenses: IncomeStatementSection,
    /// Net income.
    pub net_income: Decimal,
}

/// One entity's share of a consolidated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityAmount {
    /// Member entity.
    pub entity_id: EntityId,
    /// Entity code.
    pub entity_code: String,
    /// The entity's balance on the account.
    pub balance: Decimal,
}

/// An account summed across a consolidation group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedAccount {
    /// Group-level balance.
    #[serde(flatten)]
    pub balance: AccountBalance,
    /// Per-entity breakdown, in member order.
    pub by_entity: Vec<EntityAmount>,
}

/// One member's balances, input to consolidation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationMember {
    /// Member entity.
    pub entity_id: EntityId,
    /// Entity code.
    pub entity_code: String,
    /// Balances of the entity alone.
    pub balances: Vec<AccountBalance>,
}

/// Consolidated trial balance of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedReport {
    /// Consolidation group.
    pub group_id: ConsolidationGroupId,
    /// As of date.
    pub as_of: NaiveDate,
    /// Member entity codes, in member order.
    pub entities: Vec<String>,
    /// Accounts, by code.
    pub accounts: Vec<ConsolidatedAccount>,
    /// Group totals.
    pub totals: TrialBalanceTotals,
}

impl ConsolidatedReport {
    /// Group-level balances, for feeding the single-entity statements.
    #[must_use]
    pub fn balances(&self) -> Vec<AccountBalance> {
        self.accounts.iter().map(|a| a.balance.clone()).collect()
    }
}
