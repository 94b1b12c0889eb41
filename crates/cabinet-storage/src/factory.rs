//! Blob store construction from configuration.

use std::sync::Arc;

use tracing::info;

use cabinet_core::config::{BlobProvider, StorageConfig};
use cabinet_core::result::AppResult;
use cabinet_core::traits::BlobStore;

use crate::providers::local::LocalBlobStore;
use crate::providers::memory::MemoryBlobStore;

/// Build the blob store selected by `storage.provider`.
pub async fn build_blob_store(config: &StorageConfig) -> AppResult<Arc<dyn BlobStore>> {
    let store: Arc<dyn BlobStore> = match config.provider {
        BlobProvider::S3 => s3_store(config).await?,
        BlobProvider::Local => Arc::new(LocalBlobStore::new(&config.local.root_path).await?),
        BlobProvider::Memory => Arc::new(MemoryBlobStore::new()),
    };
    info!(provider = store.provider_type(), "Blob store ready");
    Ok(store)
}

#[cfg(feature = "s3")]
async fn s3_store(config: &StorageConfig) -> AppResult<Arc<dyn BlobStore>> {
    Ok(Arc::new(crate::providers::s3::S3BlobStore::new(&config.s3).await?))
}

#[cfg(not(feature = "s3"))]
async fn s3_store(_config: &StorageConfig) -> AppResult<Arc<dyn BlobStore>> {
    Err(cabinet_core::AppError::configuration(
        "storage.provider = \"s3\" requires the `s3` feature",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builds_configured_provider() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = StorageConfig::default();

        config.provider = BlobProvider::Memory;
        assert_eq!(build_blob_store(&config).await.expect("memory").provider_type(), "memory");

        config.provider = BlobProvider::Local;
        config.local.root_path = dir.path().display().to_string();
        assert_eq!(build_blob_store(&config).await.expect("local").provider_type(), "local");
    }
}
