use ledgerwise_core::accounts::RemovalMode;
use ledgerwise_core::import::parse_rows;
use ledgerwise_core::reports::ReportPeriod;
use ledgerwise_db::{AccountRepository, JournalRepository};
use tracing::info;

use super::{Context, print_json, read_upload};
use crate::cli::AccountsCommand;

pub async fn run(ctx: &Context, command: AccountsCommand) -> anyhow::Result<()> {
    match command {
        AccountsCommand::List { client } => {
            let accounts = AccountRepository::new(ctx.db.clone())
                .list(client.client)
                .await?;
            print_json(&accounts)
        }
        AccountsCommand::Import {
            file,
            client,
            removal,
            dry_run,
        } => {
            let mode = removal.map_or_else(
                || RemovalMode::from(ctx.config.import.removal_mode),
                RemovalMode::from,
            );
            let (bytes, filename) = read_upload(&file).await?;
            let rows = parse_rows(&bytes, &filename, delimiter(ctx)?)?;
            let repo = AccountRepository::new(ctx.db.clone());

            let summary = if dry_run {
                let mut chart = repo.load_chart(client.client).await?;
                chart.import(&rows, mode)
            } else {
                let plan = repo.plan_import(client.client, &rows, mode).await?;
                repo.apply_import_plan(client.client, &plan).await?
            };
            info!(
                client_id = %client.client,
                dry_run,
                added = summary.added,
                updated = summary.updated,
                warnings = summary.warnings.len(),
                "Chart import finished"
            );
            print_json(&summary)
        }
        AccountsCommand::Ledger {
            account,
            client,
            period,
        } => {
            let period = ReportPeriod::new(period.from, period.to)?;
            let lines = JournalRepository::new(ctx.db.clone())
                .lines_for_account(client.client, account, &period)
                .await?;
            print_json(&lines)
        }
    }
}

/// Upload delimiter from configuration.
pub fn delimiter(ctx: &Context) -> anyhow::Result<u8> {
    u8::try_from(ctx.config.import.delimiter)
        .map_err(|_| anyhow::anyhow!("import delimiter must be a single-byte character"))
}
