use std::sync::Arc;

use anyhow::Context as _;
use ledgerwise_core::attachment::{AttachmentService, NewAttachment};
use ledgerwise_core::storage::{StorageConfig, StorageProvider, StorageService};
use ledgerwise_db::AttachmentRepository;
use tracing::info;

use super::{Context, print_json, read_upload};
use crate::cli::AttachmentsCommand;

fn service(ctx: &Context) -> anyhow::Result<AttachmentService<AttachmentRepository>> {
    let settings = &ctx.config.storage;
    let storage = StorageService::from_config(
        StorageConfig::new(StorageProvider::local_fs(settings.root.clone()))
            .with_max_file_size(settings.max_file_size),
    )?;
    Ok(AttachmentService::new(
        Arc::new(storage),
        Arc::new(AttachmentRepository::new(ctx.db.clone())),
    ))
}

pub async fn run(ctx: &Context, command: AttachmentsCommand) -> anyhow::Result<()> {
    let attachments = service(ctx)?;
    match command {
        AttachmentsCommand::Add {
            file,
            client,
            entity,
            entry,
            attachment_type,
            content_type,
        } => {
            let (bytes, filename) = read_upload(&file).await?;
            let attachment = attachments
                .add(
                    NewAttachment {
                        client_id: client.client,
                        entity_id: entity,
                        journal_entry_id: entry,
                        filename,
                        content_type,
                        attachment_type,
                    },
                    bytes,
                )
                .await?;
            print_json(&attachment)
        }
        AttachmentsCommand::List { client, entry } => {
            print_json(&attachments.list(entry, client.client).await?)
        }
        AttachmentsCommand::Download { id, client, output } => {
            let (attachment, bytes) = attachments.download(id, client.client).await?;
            tokio::fs::write(&output, &bytes)
                .await
                .with_context(|| format!("failed to write {}", output.display()))?;
            info!(
                attachment_id = %attachment.id,
                size = bytes.len(),
                path = %output.display(),
                "Attachment saved"
            );
            Ok(())
        }
        AttachmentsCommand::Remove { id, client } => {
            attachments.remove(id, client.client).await?;
            info!(attachment_id = %id, "Attachment removed");
            Ok(())
        }
    }
}
