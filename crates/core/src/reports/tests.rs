//! Tests for the reports module.

use chrono::NaiveDate;
use ledgerwise_shared::types::{
    AccountId, ClientId, ConsolidationGroupId, DimensionId, DimensionValueId, EntityId,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::consolidation::ConsolidationService;
use super::error::ReportError;
use super::service::ReportService;
use super::types::{AccountTotals, ConsolidationMember, PostedLine, ReportPeriod};
use crate::accounts::{Account, AccountType};
use crate::dimension::{DimensionFilter, DimensionTag};
use crate::journal::LineAmount;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
}

fn account(code: &str, kind: AccountType, subtype: Option<&str>) -> Account {
    Account {
        id: AccountId::new(),
        client_id: ClientId::new(),
        code: code.to_string(),
        name: format!("Account {code}"),
        account_type: kind,
        subtype: subtype.map(ToString::to_string),
        description: None,
        parent_id: None,
        is_active: true,
    }
}

/// Cash, payables, capital, sales, cost of sales, rent.
fn chart() -> Vec<Account> {
    vec![
        account("1000", AccountType::Asset, Some("current_asset")),
        account("2000", AccountType::Liability, None),
        account("3000", AccountType::Equity, None),
        account("4000", AccountType::Revenue, None),
        account("5000", AccountType::Expense, Some("cost_of_goods_sold")),
        account("6000", AccountType::Expense, Some("operating_expense")),
    ]
}

fn posted(account: &Account, entity: EntityId, day: u32, amount: LineAmount) -> PostedLine {
    PostedLine {
        account_id: account.id,
        entity_id: entity,
        entry_date: date(day),
        amount,
        dimensions: Vec::new(),
    }
}

/// A balanced pair: debit `dr`, credit `cr`.
fn pair(chart: &[Account], dr: usize, cr: usize, amount: Decimal, day: u32) -> Vec<PostedLine> {
    let entity = EntityId::new();
    vec![
        posted(&chart[dr], entity, day, LineAmount::debit(amount)),
        posted(&chart[cr], entity, day, LineAmount::credit(amount)),
    ]
}

fn ledger(chart: &[Account]) -> Vec<PostedLine> {
    [
        pair(chart, 0, 2, dec!(10000), 1),
        pair(chart, 0, 3, dec!(4000), 5),
        pair(chart, 4, 0, dec!(1500), 6),
        pair(chart, 5, 1, dec!(800), 20),
    ]
    .concat()
}

#[test]
fn test_balances_use_normal_side() {
    let chart = chart();
    let balances = ReportService::balances_from_lines(
        &chart,
        &ledger(&chart),
        &ReportPeriod::as_of(date(31)),
        &DimensionFilter::new(),
    );
    let codes: Vec<_> = balances.iter().map(|b| b.code.as_str()).collect();
    assert_eq!(codes, vec!["1000", "2000", "3000", "4000", "5000", "6000"]);
    assert_eq!(balances[0].balance, dec!(12500));
    assert_eq!(balances[0].debit_balance(), dec!(12500));
    assert_eq!(balances[1].balance, dec!(800));
    assert_eq!(balances[1].credit_balance(), dec!(800));
    assert_eq!(balances[3].balance, dec!(4000));
}

#[test]
fn test_period_and_filter_restrict_lines() {
    let chart = chart();
    let mut lines = ledger(&chart);
    let value = DimensionValueId::new();
    lines[6].dimensions.push(DimensionTag {
        dimension_id: DimensionId::new(),
        dimension_value_id: value,
        dimension_name: "Department".into(),
        value_name: "Ops".into(),
    });

    let period = ReportPeriod::new(Some(date(5)), date(10)).unwrap();
    let balances =
        ReportService::balances_from_lines(&chart, &lines, &period, &DimensionFilter::new());
    assert_eq!(balances.len(), 3);

    let filter = DimensionFilter::new().with_value(value);
    let tagged =
        ReportService::balances_from_lines(&chart, &lines, &ReportPeriod::as_of(date(31)), &filter);
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].code, "6000");
}

#[test]
fn test_invalid_period() {
    let err = ReportPeriod::new(Some(date(10)), date(1)).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_DATE_RANGE");
    assert!(ReportPeriod::as_of(date(1)).contains(date(1)));
}

#[test]
fn test_balance_sheet_includes_current_earnings() {
    let chart = chart();
    let balances = ReportService::balances_from_lines(
        &chart,
        &ledger(&chart),
        &ReportPeriod::as_of(date(31)),
        &DimensionFilter::new(),
    );
    let report = ReportService::balance_sheet(date(31), balances);
    assert_eq!(report.total_assets, dec!(12500));
    assert_eq!(report.current_earnings, dec!(1700));
    assert_eq!(report.total_equity, dec!(11700));
    assert!(report.is_balanced);
    assert_eq!(report.assets.subsections[0].name, "current_asset");
    assert_eq!(report.assets.subsections[0].total, dec!(12500));
}

#[test]
fn test_income_statement_sections() {
    let chart = chart();
    let period = ReportPeriod::new(Some(date(1)), date(31)).unwrap();
    let balances = ReportService::balances_from_lines(
        &chart,
        &ledger(&chart),
        &period,
        &DimensionFilter::new(),
    );
    let report = ReportService::income_statement(period, balances);
    assert_eq!(report.revenue.total, dec!(4000));
    assert_eq!(report.cost_of_goods_sold.total, dec!(1500));
    assert_eq!(report.gross_profit, dec!(2500));
    assert_eq!(report.operating_expenses.total, dec!(800));
    assert_eq!(report.net_income, dec!(1700));
    assert!(report.other_expenses.accounts.is_empty());
}

#[test]
fn test_totals_with_unknown_account_fail() {
    let chart = chart();
    let totals = [AccountTotals {
        account_id: AccountId::new(),
        total_debit: dec!(1),
        total_credit: Decimal::ZERO,
    }];
    let err = ReportService::balances_from_totals(&chart, &totals).unwrap_err();
    assert!(matches!(err, ReportError::AccountNotFound(_)));
}

#[test]
fn test_consolidation_sums_by_account_with_breakdown() {
    let chart = chart();
    let (us, uk) = (EntityId::new(), EntityId::new());
    let member = |entity_id, code: &str, totals: &[(usize, Decimal, Decimal)]| ConsolidationMember {
        entity_id,
        entity_code: code.to_string(),
        balances: ReportService::balances_from_totals(
            &chart,
            &totals
                .iter()
                .map(|(i, dr, cr)| AccountTotals {
                    account_id: chart[*i].id,
                    total_debit: *dr,
                    total_credit: *cr,
                })
                .collect::<Vec<_>>(),
        )
        .unwrap(),
    };
    let members = vec![
        member(us, "US", &[(0, dec!(500), Decimal::ZERO), (3, Decimal::ZERO, dec!(500))]),
        member(uk, "UK", &[(0, dec!(300), dec!(100)), (2, Decimal::ZERO, dec!(200))]),
    ];

    let report = ConsolidationService::consolidate(ConsolidationGroupId::new(), date(31), &members)
        .unwrap();
    assert_eq!(report.entities, vec!["US", "UK"]);
    assert_eq!(report.accounts.len(), 3);

    let cash = &report.accounts[0];
    assert_eq!(cash.balance.code, "1000");
    assert_eq!(cash.balance.balance, dec!(700));
    assert_eq!(cash.by_entity.len(), 2);
    assert_eq!(cash.by_entity[1].balance, dec!(200));
    assert!(report.totals.is_balanced);

    let sheet = ReportService::balance_sheet(date(31), report.balances());
    assert!(sheet.is_balanced);
}

#[test]
fn test_consolidation_of_empty_group() {
    let err = ConsolidationService::consolidate(ConsolidationGroupId::new(), date(31), &[])
        .unwrap_err();
    assert_eq!(err.http_status_code(), 422);
}

fn entries() -> impl Strategy<Value = Vec<(usize, usize, i64)>> {
    prop::collection::vec((0usize..6, 0usize..6, 1i64..1_000_000), 1..30)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A ledger of balanced entries yields a balanced trial balance.
    #[test]
    fn prop_trial_balance_of_balanced_ledger(entries in entries()) {
        let chart = chart();
        let lines: Vec<PostedLine> = entries
            .iter()
            .flat_map(|(dr, cr, cents)| pair(&chart, *dr, *cr, Decimal::new(*cents, 2), 15))
            .collect();
        let balances = ReportService::balances_from_lines(
            &chart,
            &lines,
            &ReportPeriod::as_of(date(31)),
            &DimensionFilter::new(),
        );
        let report = ReportService::trial_balance(date(31), balances);
        prop_assert!(report.totals.is_balanced);
        prop_assert_eq!(report.totals.total_debit, report.totals.total_credit);
    }

    /// Assets = Liabilities + Equity once current earnings are included.
    #[test]
    fn prop_balance_sheet_equation(entries in entries()) {
        let chart = chart();
        let lines: Vec<PostedLine> = entries
            .iter()
            .flat_map(|(dr, cr, cents)| pair(&chart, *dr, *cr, Decimal::new(*cents, 2), 15))
            .collect();
        let balances = ReportService::balances_from_lines(
            &chart,
            &lines,
            &ReportPeriod::as_of(date(31)),
            &DimensionFilter::new(),
        );
        let report = ReportService::balance_sheet(date(31), balances);
        prop_assert!(report.is_balanced);
        prop_assert_eq!(report.total_assets, report.liabilities_and_equity);
    }

    /// Net income equals current earnings for the same lines.
    #[test]
    fn prop_net_income_matches_current_earnings(entries in entries()) {
        let chart = chart();
        let lines: Vec<PostedLine> = entries
            .iter()
            .flat_map(|(dr, cr, cents)| pair(&chart, *dr, *cr, Decimal::new(*cents, 2), 15))
            .collect();
        let period = ReportPeriod::as_of(date(31));
        let balances =
            ReportService::balances_from_lines(&chart, &lines, &period, &DimensionFilter::new());
        let income = ReportService::income_statement(period, balances.clone());
        let sheet = ReportService::balance_sheet(date(31), balances);
        prop_assert_eq!(income.net_income, sheet.current_earnings);
    }
}
