//! Deadlines for calls into the blob store and the catalog.

use std::future::Future;
use std::time::Duration;

use cabinet_core::config::SyncConfig;
use cabinet_core::error::AppError;
use cabinet_core::result::AppResult;

/// Per-call time limits.
#[derive(Debug, Clone, Copy)]
pub struct Deadlines {
    /// Limit for one blob store call.
    pub blob: Duration,
    /// Limit for one catalog call.
    pub catalog: Duration,
}

impl Deadlines {
    /// Build from the `sync` configuration section.
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            blob: config.blob_timeout(),
            catalog: config.catalog_timeout(),
        }
    }

    /// Run a blob store call under its deadline.
    pub async fn blob<T>(
        &self,
        what: &str,
        fut: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        within(self.blob, what, fut).await
    }

    /// Run a catalog call under its deadline.
    pub async fn catalog<T>(
        &self,
        what: &str,
        fut: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        within(self.catalog, what, fut).await
    }
}

impl Default for Deadlines {
    fn default() -> Self {
        Self::from_config(&SyncConfig::default())
    }
}

async fn within<T>(
    limit: Duration,
    what: &str,
    fut: impl Future<Output = AppResult<T>>,
) -> AppResult<T> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(AppError::timeout(format!(
            "{what} did not finish within {}s",
            limit.as_secs_f64()
        ))),
    }
}
