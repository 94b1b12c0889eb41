//! In-memory blob store with failure injection.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use cabinet_core::error::AppError;
use cabinet_core::result::AppResult;
use cabinet_core::traits::BlobStore;

use crate::tag::content_tag;

/// Blob store operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobOp {
    /// [`BlobStore::put`].
    Put,
    /// [`BlobStore::copy`].
    Copy,
    /// [`BlobStore::delete`].
    Delete,
    /// [`BlobStore::list`].
    List,
}

/// Blob store kept in process memory.
///
/// Tests use [`MemoryBlobStore::fail_after`] to make a chosen operation
/// fail once it has succeeded a number of times, and
/// [`MemoryBlobStore::set_delay`] to stall every call.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: DashMap<String, Bytes>,
    failures: DashMap<BlobOp, usize>,
    delay: Mutex<Option<Duration>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `op` succeed `successes` more times, then fail every call.
    pub fn fail_after(&self, op: BlobOp, successes: usize) {
        self.failures.insert(op, successes);
    }

    /// Remove all injected failures.
    pub fn clear_failures(&self) {
        self.failures.clear();
    }

    /// Sleep for `delay` before every call.
    pub fn set_delay(&self, delay: Option<Duration>) {
        if let Ok(mut guard) = self.delay.lock() {
            *guard = delay;
        }
    }

    /// Content stored under `key`.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.objects.get(key).map(|v| v.value().clone())
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    async fn enter(&self, op: BlobOp) -> AppResult<()> {
        let delay = self.delay.lock().ok().and_then(|guard| *guard);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(mut remaining) = self.failures.get_mut(&op) {
            if *remaining == 0 {
                return Err(AppError::storage(format!("Injected {op:?} failure")));
            }
            *remaining -= 1;
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn put(&self, key: &str, content: Bytes) -> AppResult<String> {
        self.enter(BlobOp::Put).await?;
        let tag = content_tag(&content);
        self.objects.insert(key.to_string(), content);
        Ok(tag)
    }

    async fn copy(&self, src: &str, dst: &str) -> AppResult<String> {
        self.enter(BlobOp::Copy).await?;
        let content = self
            .get(src)
            .ok_or_else(|| AppError::storage(format!("Copy source does not exist: {src}")))?;
        let tag = content_tag(&content);
        self.objects.insert(dst.to_string(), content);
        Ok(tag)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.enter(BlobOp::Delete).await?;
        self.objects.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> AppResult<Vec<String>> {
        self.enter(BlobOp::List).await?;
        let mut keys: Vec<String> = self
            .objects
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.objects.contains_key(key))
    }
}
