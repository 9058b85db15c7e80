//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Attachment storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Import defaults.
    #[serde(default)]
    pub import: ImportSettings,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Attachment storage settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Root directory for the local filesystem backend.
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,
    /// Maximum attachment size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("./data/attachments")
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            max_file_size: default_max_file_size(),
        }
    }
}

/// How accounts missing from an uploaded chart are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalModeSetting {
    /// Mark missing accounts inactive.
    #[default]
    Deactivate,
    /// Delete missing accounts when they have no lines and no children.
    Delete,
}

/// Import defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportSettings {
    /// Default handling of accounts absent from an uploaded chart.
    #[serde(default)]
    pub removal_mode: RemovalModeSetting,
    /// Field delimiter for delimited-text uploads.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_delimiter() -> char {
    ','
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            removal_mode: RemovalModeSetting::default(),
            delimiter: default_delimiter(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_filter() -> String {
    "ledgerwise=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LEDGERWISE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("LEDGERWISE__DATABASE__URL", Some("postgres://localhost/ledgerwise")),
                ("LEDGERWISE__IMPORT__REMOVAL_MODE", Some("delete")),
                ("LEDGERWISE__LOGGING__FORMAT", Some("json")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/ledgerwise");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.import.removal_mode, RemovalModeSetting::Delete);
                assert_eq!(config.logging.format, LogFormat::Json);
            },
        );
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        temp_env::with_vars(
            [("LEDGERWISE__DATABASE__URL", Some("postgres://db/ledger"))],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.storage.max_file_size, 10 * 1024 * 1024);
                assert_eq!(config.import.removal_mode, RemovalModeSetting::Deactivate);
                assert_eq!(config.import.delimiter, ',');
                assert_eq!(config.logging.filter, "ledgerwise=info");
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars_unset(["LEDGERWISE__DATABASE__URL"], || {
            assert!(AppConfig::load().is_err());
        });
    }
}
