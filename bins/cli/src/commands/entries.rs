use std::collections::HashSet;

use ledgerwise_core::accounts::ChartIndex;
use ledgerwise_core::dimension::PendingDimensionValue;
use ledgerwise_core::review::{
    FieldError, GroupFilter, GroupKey, GroupSort, ReviewSession, ReviewSummary,
};
use ledgerwise_db::{AccountRepository, DimensionRepository, JournalRepository};
use ledgerwise_shared::types::JournalEntryId;
use serde::Serialize;
use tracing::{info, warn};

use super::accounts::delimiter;
use super::{Context, print_json, read_upload};
use crate::cli::{EntriesCommand, ReviewArgs};

pub async fn run(ctx: &Context, command: EntriesCommand) -> anyhow::Result<()> {
    let journal = JournalRepository::new(ctx.db.clone());
    match command {
        EntriesCommand::Review(args) => review(ctx, &journal, &args).await,
        EntriesCommand::List { client, status } => {
            print_json(&journal.list_entries(client.client, status).await?)
        }
        EntriesCommand::Show { id, client } => {
            print_json(&journal.find_entry(client.client, id).await?)
        }
        EntriesCommand::Submit { id, client, role } => {
            print_json(&journal.submit(client.client, id, role).await?)
        }
        EntriesCommand::Approve { id, client, role } => {
            print_json(&journal.approve(client.client, id, role).await?)
        }
        EntriesCommand::Reject {
            id,
            client,
            role,
            reason,
        } => print_json(
            &journal
                .reject(client.client, id, role, &reason)
                .await?,
        ),
        EntriesCommand::Reverse { id, client, date } => {
            print_json(&journal.reverse_entry(client.client, id, date).await?)
        }
        EntriesCommand::Delete { id, client } => {
            journal.delete_draft(client.client, id).await?;
            info!(entry_id = %id, "Draft deleted");
            Ok(())
        }
    }
}

#[derive(Debug, Serialize)]
struct GroupReport {
    key: GroupKey,
    valid: bool,
    selected: bool,
    errors: Vec<FieldError>,
    pending_values: Vec<PendingDimensionValue>,
}

#[derive(Debug, Serialize)]
struct ReviewReport {
    summary: ReviewSummary,
    groups: Vec<GroupReport>,
    committed: Vec<JournalEntryId>,
    skipped: usize,
}

async fn review(
    ctx: &Context,
    journal: &JournalRepository,
    args: &ReviewArgs,
) -> anyhow::Result<()> {
    let client_id = args.client.client;
    let dimensions = DimensionRepository::new(ctx.db.clone());
    let chart = ChartIndex::new(AccountRepository::new(ctx.db.clone()).list(client_id).await?);
    let catalog = dimensions.load_catalog(client_id).await?;

    let (bytes, filename) = read_upload(&args.file).await?;
    let mut session = ReviewSession::from_upload(
        client_id,
        args.entity,
        &bytes,
        &filename,
        delimiter(ctx)?,
        chart,
        catalog,
    )?;

    if args.approve_values {
        approve_pending_values(&mut session, &dimensions).await?;
    }

    for key in &args.select {
        session.set_selected(&GroupKey::from(key.as_str()), true)?;
    }
    if args.select_all {
        session.select_all_visible(GroupFilter::Valid, true);
    }

    let mut committed = Vec::new();
    let mut skipped = 0;
    if args.commit {
        let batch = session.prepare_commit();
        skipped = batch.skipped;
        if batch.entries.is_empty() {
            warn!("No selected valid groups to commit");
        } else {
            let stored = journal.create_entries(&batch.entries).await?;
            session.mark_committed(&batch.keys);
            committed = stored.iter().map(|e| e.id).collect();
        }

        if let Some(role) = args.submit_as {
            for &id in &committed {
                journal.submit(client_id, id, role).await?;
            }
        }
    }

    let groups = session
        .view(GroupFilter::All, GroupSort::FileOrder)
        .into_iter()
        .map(|g| GroupReport {
            key: g.key.clone(),
            valid: g.is_valid(),
            selected: g.selected,
            errors: g
                .validation
                .as_ref()
                .map(|v| v.errors.clone())
                .unwrap_or_default(),
            pending_values: g
                .validation
                .as_ref()
                .map(|v| v.pending_values.clone())
                .unwrap_or_default(),
        })
        .collect();

    print_json(&ReviewReport {
        summary: session.summary(),
        groups,
        committed,
        skipped,
    })
}

/// Approves every distinct pending value in the session and stores it.
async fn approve_pending_values(
    session: &mut ReviewSession,
    dimensions: &DimensionRepository,
) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    let pending: Vec<PendingDimensionValue> = session
        .groups()
        .iter()
        .filter_map(|g| g.validation.as_ref())
        .flat_map(|v| v.pending_values.iter().cloned())
        .filter(|p| seen.insert((p.dimension_id, p.value_name.to_lowercase())))
        .collect();

    for value in &pending {
        let approved = session.approve_dimension_value(value)?;
        dimensions.create_value(&approved).await?;
    }
    Ok(())
}
