use ledgerwise_core::dimension::DimensionFilter;
use ledgerwise_core::reports::ReportPeriod;
use ledgerwise_db::ReportRepository;

use super::{Context, print_json};
use crate::cli::{PeriodArgs, ReportsCommand, ScopeArgs};

pub async fn run(ctx: &Context, command: ReportsCommand) -> anyhow::Result<()> {
    let reports = ReportRepository::new(ctx.db.clone());
    match command {
        ReportsCommand::TrialBalance { scope, period } => {
            let report = reports
                .trial_balance(
                    scope.client.client,
                    scope.entity,
                    &to_period(&period)?,
                    &to_filter(&scope),
                )
                .await?;
            print_json(&report)
        }
        ReportsCommand::BalanceSheet {
            client,
            entity,
            as_of,
        } => print_json(&reports.balance_sheet(client.client, entity, as_of).await?),
        ReportsCommand::IncomeStatement { scope, period } => {
            let report = reports
                .income_statement(
                    scope.client.client,
                    scope.entity,
                    &to_period(&period)?,
                    &to_filter(&scope),
                )
                .await?;
            print_json(&report)
        }
        ReportsCommand::Consolidate {
            client,
            group,
            as_of,
        } => print_json(
            &reports
                .consolidated_trial_balance(client.client, group, as_of)
                .await?,
        ),
    }
}

fn to_period(args: &PeriodArgs) -> anyhow::Result<ReportPeriod> {
    Ok(ReportPeriod::new(args.from, args.to)?)
}

fn to_filter(scope: &ScopeArgs) -> DimensionFilter {
    scope
        .dimension_values
        .iter()
        .fold(DimensionFilter::new(), |filter, &id| filter.with_value(id))
        .include_untagged(scope.include_untagged)
}
