//! Ledgerwise command-line interface.
//!
//! Runs chart imports, batch reviews, entry workflow, reports and
//! attachment handling against the configured database.

mod cli;
mod commands;

use anyhow::Context as _;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use ledgerwise_db::connect_with;
use ledgerwise_shared::{AppConfig, config::LogFormat, config::LoggingConfig};

use crate::cli::{Cli, Command};
use crate::commands::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Cli::parse();
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    let db = connect_with(&config.database)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");

    let ctx = Context { db, config };
    match args.command {
        Command::Accounts(args) => commands::accounts::run(&ctx, args.command).await,
        Command::Entries(args) => commands::entries::run(&ctx, args.command).await,
        Command::Reports(args) => commands::reports::run(&ctx, args.command).await,
        Command::Attachments(args) => commands::attachments::run(&ctx, args.command).await,
    }
}

/// Logs go to stderr; stdout carries command output.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);

    match logging.format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}
