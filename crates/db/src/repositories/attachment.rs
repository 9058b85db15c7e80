//! Attachment repository for attachment records.
//!
//! File bytes live in object storage; this table keeps the metadata and the
//! storage key.

use chrono::Utc;
use ledgerwise_core::attachment::{
    Attachment, AttachmentError, AttachmentRepository as AttachmentRepoTrait, AttachmentType,
};
use ledgerwise_shared::types::{AttachmentId, ClientId, EntityId, JournalEntryId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{
    attachments, journal_entries, sea_orm_active_enums::AttachmentType as DbAttachmentType,
};

/// Attachment repository implementation.
#[derive(Debug, Clone)]
pub struct AttachmentRepository {
    db: DatabaseConnection,
}

impl AttachmentRepository {
    /// Create a new attachment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl AttachmentRepoTrait for AttachmentRepository {
    async fn create(&self, attachment: Attachment) -> Result<Attachment, AttachmentError> {
        let active_model = attachments::ActiveModel {
            id: Set(attachment.id.into_inner()),
            client_id: Set(attachment.client_id.into_inner()),
            entity_id: Set(attachment.entity_id.into_inner()),
            journal_entry_id: Set(attachment.journal_entry_id.into_inner()),
            attachment_type: Set(to_db_attachment_type(attachment.attachment_type)),
            file_name: Set(attachment.filename),
            file_size: Set(attachment.file_size),
            mime_type: Set(attachment.mime_type),
            storage_provider: Set(attachment.storage_provider),
            storage_key: Set(attachment.storage_key),
            created_at: Set(Utc::now().into()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| AttachmentError::repository(e.to_string()))?;

        Ok(to_domain(model))
    }

    async fn find_by_id(
        &self,
        id: AttachmentId,
        client_id: ClientId,
    ) -> Result<Option<Attachment>, AttachmentError> {
        let model = attachments::Entity::find_by_id(id.into_inner())
            .filter(attachments::Column::ClientId.eq(client_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(|e| AttachmentError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn list_by_entry(
        &self,
        journal_entry_id: JournalEntryId,
        client_id: ClientId,
    ) -> Result<Vec<Attachment>, AttachmentError> {
        let models = attachments::Entity::find()
            .filter(attachments::Column::JournalEntryId.eq(journal_entry_id.into_inner()))
            .filter(attachments::Column::ClientId.eq(client_id.into_inner()))
            .order_by_asc(attachments::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| AttachmentError::repository(e.to_string()))?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn delete(&self, id: AttachmentId, client_id: ClientId) -> Result<bool, AttachmentError> {
        let result = attachments::Entity::delete_many()
            .filter(attachments::Column::Id.eq(id.into_inner()))
            .filter(attachments::Column::ClientId.eq(client_id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(|e| AttachmentError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    async fn entry_exists(
        &self,
        journal_entry_id: JournalEntryId,
        client_id: ClientId,
    ) -> Result<bool, AttachmentError> {
        let count: u64 = journal_entries::Entity::find_by_id(journal_entry_id.into_inner())
            .filter(journal_entries::Column::ClientId.eq(client_id.into_inner()))
            .count(&self.db)
            .await
            .map_err(|e| AttachmentError::repository(e.to_string()))?;

        Ok(count > 0)
    }
}

/// Convert domain attachment type to database enum.
const fn to_db_attachment_type(t: AttachmentType) -> DbAttachmentType {
    match t {
        AttachmentType::Receipt => DbAttachmentType::Receipt,
        AttachmentType::Invoice => DbAttachmentType::Invoice,
        AttachmentType::Contract => DbAttachmentType::Contract,
        AttachmentType::SupportingDocument => DbAttachmentType::SupportingDocument,
        AttachmentType::Other => DbAttachmentType::Other,
    }
}

/// Convert database attachment type to domain enum.
const fn from_db_attachment_type(t: DbAttachmentType) -> AttachmentType {
    match t {
        DbAttachmentType::Receipt => AttachmentType::Receipt,
        DbAttachmentType::Invoice => AttachmentType::Invoice,
        DbAttachmentType::Contract => AttachmentType::Contract,
        DbAttachmentType::SupportingDocument => AttachmentType::SupportingDocument,
        DbAttachmentType::Other => AttachmentType::Other,
    }
}

/// Convert database model to domain model.
fn to_domain(model: attachments::Model) -> Attachment {
    Attachment {
        id: AttachmentId::from_uuid(model.id),
        client_id: ClientId::from_uuid(model.client_id),
        entity_id: EntityId::from_uuid(model.entity_id),
        journal_entry_id: JournalEntryId::from_uuid(model.journal_entry_id),
        attachment_type: from_db_attachment_type(model.attachment_type),
        filename: model.file_name,
        file_size: model.file_size,
        mime_type: model.mime_type,
        storage_provider: model.storage_provider,
        storage_key: model.storage_key,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
