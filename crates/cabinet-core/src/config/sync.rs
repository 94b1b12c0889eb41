//! Sync orchestrator configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Deadlines for remote calls and the compensation switch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Deadline for a single blob store call, in seconds.
    #[serde(default = "default_blob_timeout")]
    pub blob_timeout_seconds: u64,
    /// Deadline for a single catalog call, in seconds.
    #[serde(default = "default_catalog_timeout")]
    pub catalog_timeout_seconds: u64,
    /// Undo the blob store step when the catalog step fails.
    #[serde(default = "default_true")]
    pub compensate: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            blob_timeout_seconds: default_blob_timeout(),
            catalog_timeout_seconds: default_catalog_timeout(),
            compensate: true,
        }
    }
}

impl SyncConfig {
    /// Blob store call deadline.
    pub fn blob_timeout(&self) -> Duration {
        Duration::from_secs(self.blob_timeout_seconds)
    }

    /// Catalog call deadline.
    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog_timeout_seconds)
    }
}

fn default_blob_timeout() -> u64 {
    30
}

fn default_catalog_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}
