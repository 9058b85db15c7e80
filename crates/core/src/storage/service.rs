//! Storage service implementation using Apache OpenDAL.

use ledgerwise_shared::types::{AttachmentId, ClientId, EntityId, JournalEntryId};
use opendal::{Operator, services};
use tracing::debug;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Metadata about a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// Storage key.
    pub storage_key: String,
    /// Size in bytes.
    pub file_size: u64,
}

/// Storage service for attachment bytes.
#[derive(Debug, Clone)]
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        let operator = match provider {
            StorageProvider::LocalFs { root } => {
                let root = root
                    .to_str()
                    .ok_or_else(|| StorageError::configuration("invalid path"))?;
                Operator::new(services::Fs::default().root(root)).map(|b| b.finish())
            }
            StorageProvider::Memory => Operator::new(services::Memory::default()).map(|b| b.finish()),
        };
        operator.map_err(|e| StorageError::configuration(e.to_string()))
    }

    /// Writes `bytes` under `key`, replacing any existing object.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the write fails.
    pub async fn write(&self, key: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        validate_key(key)?;
        let size = bytes.len();
        self.operator
            .write(key, bytes)
            .await
            .map_err(|e| StorageError::from_opendal(key, &e))?;
        debug!(key, size, "Object written");
        Ok(())
    }

    /// Reads the object under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the object does not exist or cannot be read.
    pub async fn read(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        validate_key(key)?;
        let buffer = self
            .operator
            .read(key)
            .await
            .map_err(|e| StorageError::from_opendal(key, &e))?;
        Ok(buffer.to_vec())
    }

    /// Size of the object under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the object does not exist or cannot be accessed.
    pub async fn stat(&self, key: &str) -> Result<ObjectMetadata, StorageError> {
        validate_key(key)?;
        let meta = self
            .operator
            .stat(key)
            .await
            .map_err(|e| StorageError::from_opendal(key, &e))?;
        Ok(ObjectMetadata {
            storage_key: key.to_string(),
            file_size: meta.content_length(),
        })
    }

    /// Delete an object. Deleting a missing object succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.operator
            .delete(key)
            .await
            .map_err(|e| StorageError::from_opendal(key, &e))
    }

    /// Check if an object exists in storage.
    pub async fn exists(&self, key: &str) -> bool {
        self.operator.stat(key).await.is_ok()
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() || key.starts_with('/') || key.ends_with('/') || key.split('/').any(|p| p == "..") {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Storage key for an attachment.
///
/// Format: `{client_id}/{entity_id}/{journal_entry_id}/{attachment_id}/{sanitized_filename}`
#[must_use]
pub fn storage_key(
    client_id: ClientId,
    entity_id: EntityId,
    journal_entry_id: JournalEntryId,
    attachment_id: AttachmentId,
    filename: &str,
) -> String {
    format!(
        "{client_id}/{entity_id}/{journal_entry_id}/{attachment_id}/{}",
        sanitize_filename(filename)
    )
}

/// Sanitize filename for storage key.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores.
/// A name that sanitizes to nothing but dots becomes `file`.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.chars().all(|c| c == '.') {
        return "file".to_string();
    }
    sanitized
}
