//! Attachment types and data structures.

use chrono::{DateTime, Utc};
use ledgerwise_shared::types::{AttachmentId, ClientId, EntityId, JournalEntryId};
use serde::{Deserialize, Serialize};

/// Attachment type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentType {
    /// Receipt for expense.
    Receipt,
    /// Invoice document.
    Invoice,
    /// Contract document.
    Contract,
    /// Supporting document.
    SupportingDocument,
    /// Other document type.
    #[default]
    Other,
}

impl AttachmentType {
    /// Convert to database string value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Receipt => "receipt",
            Self::Invoice => "invoice",
            Self::Contract => "contract",
            Self::SupportingDocument => "supporting_document",
            Self::Other => "other",
        }
    }

    /// Parse from database string value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "receipt" => Some(Self::Receipt),
            "invoice" => Some(Self::Invoice),
            "contract" => Some(Self::Contract),
            "supporting_document" => Some(Self::SupportingDocument),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Input for attaching a file to an entry.
#[derive(Debug, Clone)]
pub struct NewAttachment {
    /// Client ID.
    pub client_id: ClientId,
    /// Entity owning the entry.
    pub entity_id: EntityId,
    /// Entry to attach to.
    pub journal_entry_id: JournalEntryId,
    /// Original filename.
    pub filename: String,
    /// Declared MIME type, if any.
    pub content_type: Option<String>,
    /// Attachment type classification.
    pub attachment_type: AttachmentType,
}

/// Attachment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Unique identifier.
    pub id: AttachmentId,
    /// Client ID.
    pub client_id: ClientId,
    /// Entity owning the entry.
    pub entity_id: EntityId,
    /// Entry the file belongs to.
    pub journal_entry_id: JournalEntryId,
    /// Attachment type.
    pub attachment_type: AttachmentType,
    /// Original filename.
    pub filename: String,
    /// File size in bytes.
    pub file_size: i64,
    /// Effective MIME type.
    pub mime_type: String,
    /// Storage provider.
    pub storage_provider: String,
    /// Storage key.
    pub storage_key: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_type_roundtrip() {
        let types = [
            AttachmentType::Receipt,
            AttachmentType::Invoice,
            AttachmentType::Contract,
            AttachmentType::SupportingDocument,
            AttachmentType::Other,
        ];

        for t in types {
            assert_eq!(AttachmentType::parse(t.as_str()), Some(t));
        }
    }

    #[test]
    fn test_attachment_type_unknown() {
        assert_eq!(AttachmentType::parse("unknown"), None);
    }
}
