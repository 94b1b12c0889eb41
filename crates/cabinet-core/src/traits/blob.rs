//! Blob store trait for pluggable object storage backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for the object store holding file content and folder markers.
///
/// Keys are flat strings shaped `owner/[folder/[subfolder/]]name[/]`; a
/// trailing slash marks a folder. Writes return an opaque integrity tag
/// (an ETag for S3, a SHA-256 digest elsewhere) that the catalog keeps
/// next to the key.
///
/// Implementations live in `cabinet-storage`.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "s3", "local").
    fn provider_type(&self) -> &str;

    /// Check whether the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write `content` under `key`, replacing any existing object.
    async fn put(&self, key: &str, content: Bytes) -> AppResult<String>;

    /// Copy the object at `src` to `dst` and return the new object's tag.
    async fn copy(&self, src: &str, dst: &str) -> AppResult<String>;

    /// Delete the object at `key`. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// List every key starting with `prefix`, sorted ascending.
    async fn list(&self, prefix: &str) -> AppResult<Vec<String>>;

    /// Check whether an object exists at `key`.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}
