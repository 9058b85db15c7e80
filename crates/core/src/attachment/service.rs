//! Attachment service implementation.

use std::sync::Arc;

use chrono::Utc;
use ledgerwise_shared::types::{AttachmentId, ClientId, JournalEntryId};
use tracing::{info, warn};

use super::error::AttachmentError;
use super::policy::AttachmentPolicy;
use super::types::{Attachment, NewAttachment};
use crate::storage::{StorageService, storage_key};

/// Repository trait for attachment persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait AttachmentRepository: Send + Sync {
    /// Create a new attachment record.
    fn create(
        &self,
        attachment: Attachment,
    ) -> impl std::future::Future<Output = Result<Attachment, AttachmentError>> + Send;

    /// Find attachment by ID.
    fn find_by_id(
        &self,
        id: AttachmentId,
        client_id: ClientId,
    ) -> impl std::future::Future<Output = Result<Option<Attachment>, AttachmentError>> + Send;

    /// List attachments for a journal entry, oldest first.
    fn list_by_entry(
        &self,
        journal_entry_id: JournalEntryId,
        client_id: ClientId,
    ) -> impl std::future::Future<Output = Result<Vec<Attachment>, AttachmentError>> + Send;

    /// Delete attachment by ID.
    fn delete(
        &self,
        id: AttachmentId,
        client_id: ClientId,
    ) -> impl std::future::Future<Output = Result<bool, AttachmentError>> + Send;

    /// Check if the journal entry exists for the client.
    fn entry_exists(
        &self,
        journal_entry_id: JournalEntryId,
        client_id: ClientId,
    ) -> impl std::future::Future<Output = Result<bool, AttachmentError>> + Send;
}

/// Attachment service for managing files on journal entries.
pub struct AttachmentService<R: AttachmentRepository> {
    storage: Arc<StorageService>,
    repo: Arc<R>,
    policy: AttachmentPolicy,
}

impl<R: AttachmentRepository> AttachmentService<R> {
    /// Create a new attachment service; the size cap comes from storage config.
    #[must_use]
    pub fn new(storage: Arc<StorageService>, repo: Arc<R>) -> Self {
        let policy = AttachmentPolicy::with_max_file_size(storage.config().max_file_size);
        Self {
            storage,
            repo,
            policy,
        }
    }

    /// Stores a file and records it against its entry.
    ///
    /// If the record cannot be written the stored object is removed again.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file is empty, too large, or of a disallowed type
    /// - The journal entry does not exist
    /// - Storage or repository operations fail
    pub async fn add(
        &self,
        input: NewAttachment,
        bytes: Vec<u8>,
    ) -> Result<Attachment, AttachmentError> {
        let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        let mime_type = self
            .policy
            .check(input.content_type.as_deref(), &input.filename, size)?;

        if !self
            .repo
            .entry_exists(input.journal_entry_id, input.client_id)
            .await?
        {
            return Err(AttachmentError::EntryNotFound(input.journal_entry_id));
        }

        let id = AttachmentId::new();
        let key = storage_key(
            input.client_id,
            input.entity_id,
            input.journal_entry_id,
            id,
            &input.filename,
        );
        self.storage.write(&key, bytes).await?;

        let attachment = Attachment {
            id,
            client_id: input.client_id,
            entity_id: input.entity_id,
            journal_entry_id: input.journal_entry_id,
            attachment_type: input.attachment_type,
            filename: input.filename,
            file_size: i64::try_from(size).unwrap_or(i64::MAX),
            mime_type,
            storage_provider: self.storage.provider_name().to_string(),
            storage_key: key.clone(),
            created_at: Utc::now(),
        };

        match self.repo.create(attachment).await {
            Ok(attachment) => {
                info!(
                    attachment_id = %attachment.id,
                    journal_entry_id = %attachment.journal_entry_id,
                    size,
                    "Attachment added"
                );
                Ok(attachment)
            }
            Err(err) => {
                if let Err(cleanup) = self.storage.delete(&key).await {
                    warn!(key = %key, error = %cleanup, "Orphaned object after failed insert");
                }
                Err(err)
            }
        }
    }

    /// Deletes an attachment record and its stored object.
    ///
    /// # Errors
    ///
    /// Returns an error if the attachment does not exist or the record
    /// cannot be deleted.
    pub async fn remove(
        &self,
        attachment_id: AttachmentId,
        client_id: ClientId,
    ) -> Result<(), AttachmentError> {
        let attachment = self.get(attachment_id, client_id).await?;
        self.repo.delete(attachment_id, client_id).await?;

        if let Err(err) = self.storage.delete(&attachment.storage_key).await {
            warn!(
                attachment_id = %attachment_id,
                key = %attachment.storage_key,
                error = %err,
                "Stored object left behind"
            );
        }
        info!(attachment_id = %attachment_id, "Attachment removed");
        Ok(())
    }

    /// Lists attachments of a journal entry.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails.
    pub async fn list(
        &self,
        journal_entry_id: JournalEntryId,
        client_id: ClientId,
    ) -> Result<Vec<Attachment>, AttachmentError> {
        self.repo.list_by_entry(journal_entry_id, client_id).await
    }

    /// Get attachment by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if attachment not found or database operation fails.
    pub async fn get(
        &self,
        attachment_id: AttachmentId,
        client_id: ClientId,
    ) -> Result<Attachment, AttachmentError> {
        self.repo
            .find_by_id(attachment_id, client_id)
            .await?
            .ok_or(AttachmentError::NotFound(attachment_id))
    }

    /// Returns the record and the stored bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the attachment or its object is missing.
    pub async fn download(
        &self,
        attachment_id: AttachmentId,
        client_id: ClientId,
    ) -> Result<(Attachment, Vec<u8>), AttachmentError> {
        let attachment = self.get(attachment_id, client_id).await?;
        let bytes = self.storage.read(&attachment.storage_key).await?;
        Ok((attachment, bytes))
    }
}
