//! Subcommand handlers.

pub mod accounts;
pub mod attachments;
pub mod entries;
pub mod reports;

use std::path::Path;

use anyhow::Context as _;
use ledgerwise_shared::AppConfig;
use sea_orm::DatabaseConnection;
use serde::Serialize;

/// What every handler needs.
pub struct Context {
    pub db: DatabaseConnection,
    pub config: AppConfig,
}

/// Prints a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Reads an upload, returning its bytes and file name.
pub async fn read_upload(path: &Path) -> anyhow::Result<(Vec<u8>, String)> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((bytes, filename))
}
