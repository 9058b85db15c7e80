//! Storage configuration types.

use std::path::PathBuf;

use ledgerwise_shared::config::StorageSettings;
use serde::{Deserialize, Serialize};

/// Storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// Local filesystem.
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// In-process memory; contents vanish with the process.
    Memory,
}

impl StorageProvider {
    /// Create local filesystem provider.
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the provider name recorded with each attachment.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LocalFs { .. } => "local",
            Self::Memory => "memory",
        }
    }
}

/// Storage service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Maximum object size in bytes.
    pub max_file_size: u64,
}

impl StorageConfig {
    /// Default max file size: 10MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// In-memory storage for tests and dry runs.
    #[must_use]
    pub fn memory() -> Self {
        Self::new(StorageProvider::Memory)
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }
}

impl From<&StorageSettings> for StorageConfig {
    fn from(settings: &StorageSettings) -> Self {
        Self::new(StorageProvider::local_fs(&settings.root)).with_max_file_size(settings.max_file_size)
    }
}
