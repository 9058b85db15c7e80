//! Report generation service.

use std::collections::HashMap;

use chrono::NaiveDate;
use ledgerwise_shared::types::AccountId;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::error::ReportError;
use super::types::{
    AccountBalance, AccountTotals, BalanceSheetReport, BalanceSheetSection,
    BalanceSheetSubsection, IncomeStatementReport, IncomeStatementSection, PostedLine,
    ReportPeriod, TrialBalanceReport, TrialBalanceTotals,
};
use crate::accounts::{Account, AccountType};
use crate::dimension::DimensionFilter;
use crate::journal::within_tolerance;

/// Subtypes routed to cost of goods sold.
const COGS_SUBTYPES: [&str; 2] = ["cost_of_goods_sold", "cogs"];
/// Subtypes routed to operating expenses.
const OPEX_SUBTYPES: [&str; 2] = ["operating_expense", "opex"];

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Balances from posted lines in `period` that pass `filter`.
    ///
    /// Accounts without activity are left out; the result is ordered by code.
    /// Lines on accounts outside `chart` are skipped with a warning.
    #[must_use]
    pub fn balances_from_lines(
        chart: &[Account],
        lines: &[PostedLine],
        period: &ReportPeriod,
        filter: &DimensionFilter,
    ) -> Vec<AccountBalance> {
        let mut totals: HashMap<AccountId, (Decimal, Decimal)> = HashMap::new();
        for line in lines
            .iter()
            .filter(|l| period.contains(l.entry_date) && filter.matches(&l.dimensions))
        {
            let entry = totals.entry(line.account_id).or_default();
            entry.0 += line.amount.debit_amount();
            entry.1 += line.amount.credit_amount();
        }

        let mut balances: Vec<AccountBalance> = chart
            .iter()
            .filter_map(|account| {
                totals
                    .remove(&account.id)
                    .map(|(debit, credit)| AccountBalance::new(account, debit, credit))
            })
            .collect();
        if !totals.is_empty() {
            warn!(accounts = totals.len(), "Posted lines reference unknown accounts");
        }
        balances.sort_by(|a, b| a.code.cmp(&b.code));
        balances
    }

    /// Balances from per-account totals computed by storage.
    ///
    /// # Errors
    ///
    /// Returns an error if a total references an account outside `chart`.
    pub fn balances_from_totals(
        chart: &[Account],
        totals: &[AccountTotals],
    ) -> Result<Vec<AccountBalance>, ReportError> {
        let by_id: HashMap<AccountId, &Account> = chart.iter().map(|a| (a.id, a)).collect();
        let mut balances = totals
            .iter()
            .map(|t| {
                by_id
                    .get(&t.account_id)
                    .map(|account| AccountBalance::new(account, t.total_debit, t.total_credit))
                    .ok_or(ReportError::AccountNotFound(t.account_id))
            })
            .collect::<Result<Vec<_>, _>>()?;
        balances.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(balances)
    }

    /// Generates a trial balance report from account balances.
    ///
    /// The trial balance verifies that total debits equal total credits.
    #[must_use]
    pub fn trial_balance(as_of: NaiveDate, accounts: Vec<AccountBalance>) -> TrialBalanceReport {
        let totals = Self::totals(&accounts);
        debug!(
            %as_of,
            accounts = accounts.len(),
            is_balanced = totals.is_balanced,
            "Trial balance generated"
        );
        TrialBalanceReport {
            as_of,
            accounts,
            totals,
        }
    }

    pub(crate) fn totals(accounts: &[AccountBalance]) -> TrialBalanceTotals {
        let total_debit: Decimal = accounts.iter().map(|a| a.total_debit).sum();
        let total_credit: Decimal = accounts.iter().map(|a| a.total_credit).sum();
        TrialBalanceTotals {
            total_debit,
            total_credit,
            is_balanced: within_tolerance(total_debit, total_credit),
        }
    }

    /// Generates a balance sheet report from cumulative account balances.
    ///
    /// Revenue and expense balances are not yet closed to equity, so their
    /// net is reported as current earnings inside equity. That is what makes
    /// Assets = Liabilities + Equity hold for any balanced ledger.
    #[must_use]
    pub fn balance_sheet(as_of: NaiveDate, accounts: Vec<AccountBalance>) -> BalanceSheetReport {
        let mut assets = BalanceSheetSection::default();
        let mut liabilities = BalanceSheetSection::default();
        let mut equity = BalanceSheetSection::default();
        let mut current_earnings = Decimal::ZERO;

        for account in accounts {
            match account.account_type {
                AccountType::Asset => Self::add_to_section(&mut assets, account),
                AccountType::Liability => Self::add_to_section(&mut liabilities, account),
                AccountType::Equity => Self::add_to_section(&mut equity, account),
                AccountType::Revenue => current_earnings += account.balance,
                AccountType::Expense => current_earnings -= account.balance,
            }
        }

        let total_assets = assets.total;
        let total_liabilities = liabilities.total;
        let total_equity = equity.total + current_earnings;
        let liabilities_and_equity = total_liabilities + total_equity;

        BalanceSheetReport {
            as_of,
            assets,
            liabilities,
            equity,
            current_earnings,
            total_assets,
            total_liabilities,
            total_equity,
            liabilities_and_equity,
            is_balanced: within_tolerance(total_assets, liabilities_and_equity),
        }
    }

    /// Generates an income statement report from period account balances.
    ///
    /// Calculates gross profit, operating income, and net income. Expense
    /// subtypes pick the section; untyped expenses fall under other expenses.
    #[must_use]
    pub fn income_statement(
        period: ReportPeriod,
        accounts: Vec<AccountBalance>,
    ) -> IncomeStatementReport {
        let mut revenue = IncomeStatementSection::default();
        let mut cogs = IncomeStatementSection::default();
        let mut operating_expenses = IncomeStatementSection::default();
        let mut other = IncomeStatementSection::default();

        for account in accounts {
            let subtype = account.account_subtype.as_deref().map(str::to_lowercase);
            let section = match (account.account_type, subtype.as_deref()) {
                (AccountType::Revenue, _) => &mut revenue,
                (AccountType::Expense, Some(s)) if COGS_SUBTYPES.contains(&s) => &mut cogs,
                (AccountType::Expense, Some(s)) if OPEX_SUBTYPES.contains(&s) => {
                    &mut operating_expenses
                }
                (AccountType::Expense, _) => &mut other,
                _ => continue,
            };
            section.total += account.balance;
            section.accounts.push(account);
        }

        let gross_profit = revenue.total - cogs.total;
        let operating_income = gross_profit - operating_expenses.total;
        let net_income = operating_income - other.total;

        IncomeStatementReport {
            period,
            revenue,
            cost_of_goods_sold: cogs,
            gross_profit,
            operating_expenses,
            operating_income,
            other_expenses: other,
            net_income,
        }
    }

    fn add_to_section(section: &mut BalanceSheetSection, account: AccountBalance) {
        section.total += account.balance;
        if let Some(name) = account.account_subtype.clone() {
            match section.subsections.iter_mut().find(|s| s.name == name) {
                Some(sub) => {
                    sub.total += account.balance;
                    sub.accounts.push(account.clone());
                }
                None => section.subsections.push(BalanceSheetSubsection {
                    name,
                    total: account.balance,
                    accounts: vec![account.clone()],
                }),
            }
        }
        section.accounts.push(account);
    }
}
