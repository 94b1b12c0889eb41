//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field carries a serde default so an empty file yields a
//! usable development configuration.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod storage;
pub mod sync;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::{CatalogBackend, DatabaseConfig};
pub use self::logging::LoggingConfig;
pub use self::storage::{BlobProvider, LocalStorageConfig, S3StorageConfig, StorageConfig};
pub use self::sync::SyncConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (base file + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Catalog database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Blob store settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Timeouts and compensation behaviour of the sync orchestrator.
    #[serde(default)]
    pub sync: SyncConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config_path`, an optional `config/{env}.toml` overlay, and
    /// environment variables prefixed with `CABINET__`.
    pub fn load(config_path: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("CABINET")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_json::from_str("{}").expect("defaults");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.storage.provider, BlobProvider::S3);
        assert_eq!(config.storage.s3.bucket, "fm-bucket");
        assert_eq!(config.sync.blob_timeout_seconds, 30);
        assert!(config.sync.compensate);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"storage": {"provider": "memory"}}"#).expect("parse");
        assert_eq!(config.storage.provider, BlobProvider::Memory);
        assert_eq!(config.storage.local.root_path, "./data/blobs");
    }
}
