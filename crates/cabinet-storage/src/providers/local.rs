//! Local filesystem blob store.
//!
//! Keys map onto nested directories below the root. Directory segments
//! carry a `.dir` suffix and file content a `.blob` suffix, so the folder
//! marker `alice/docs/` and the root file `alice/docs` never share a path.
//! A marker is stored as a marker file inside its directory so an empty
//! folder still has an object of its own.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use cabinet_core::error::{AppError, ErrorKind};
use cabinet_core::result::AppResult;
use cabinet_core::traits::BlobStore;

use crate::tag::content_tag;

/// File name standing in for a folder marker key on disk.
const MARKER_FILE: &str = ".cabinet-folder";

/// Suffix of every directory segment on disk.
const DIR_SUFFIX: &str = ".dir";

/// Suffix of every content file on disk.
const BLOB_SUFFIX: &str = ".blob";

/// Blob store rooted at a local directory.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a store rooted at `root_path`, creating the directory if needed.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create blob root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Map a key to its file on disk.
    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        let trimmed = key.trim_start_matches('/');
        let is_marker = trimmed.ends_with('/');
        let segments: Vec<&str> = trimmed.trim_end_matches('/').split('/').collect();
        if segments.iter().any(|s| s.is_empty() || *s == "." || *s == "..") {
            return Err(AppError::validation(format!("Invalid blob key: {key}")));
        }
        let Some((last, dirs)) = segments.split_last() else {
            return Err(AppError::validation(format!("Invalid blob key: {key}")));
        };

        let mut path = self.dir_path(dirs.iter().copied());
        if is_marker {
            path.push(format!("{last}{DIR_SUFFIX}"));
            path.push(MARKER_FILE);
        } else {
            path.push(format!("{last}{BLOB_SUFFIX}"));
        }
        Ok(path)
    }

    /// Directory on disk holding the given key segments.
    fn dir_path<'a>(&self, segments: impl Iterator<Item = &'a str>) -> PathBuf {
        let mut path = self.root.clone();
        for segment in segments {
            path.push(format!("{segment}{DIR_SUFFIX}"));
        }
        path
    }

    /// Map a file on disk back to its key.
    fn key_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let (last, dirs) = parts.split_last()?;
        let dirs = dirs
            .iter()
            .map(|d| d.strip_suffix(DIR_SUFFIX))
            .collect::<Option<Vec<&str>>>()?;

        if last == MARKER_FILE {
            if dirs.is_empty() {
                return None;
            }
            return Some(format!("{}/", dirs.join("/")));
        }
        let name = last.strip_suffix(BLOB_SUFFIX)?;
        if dirs.is_empty() {
            Some(name.to_string())
        } else {
            Some(format!("{}/{name}", dirs.join("/")))
        }
    }

    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    /// Recursively collect every file below `dir`.
    async fn walk(&self, dir: PathBuf) -> AppResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending = vec![dir];
        while let Some(current) = pending.pop() {
            let mut entries = match fs::read_dir(&current).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to list directory: {}", current.display()),
                        e,
                    ));
                }
            };
            while let Some(entry) = entries.next_entry().await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to read directory entry", e)
            })? {
                let file_type = entry.file_type().await.map_err(|e| {
                    AppError::with_source(ErrorKind::Storage, "Failed to read entry type", e)
                })?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else {
                    files.push(entry.path());
                }
            }
        }
        Ok(files)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root).await.is_ok_and(|m| m.is_dir()))
    }

    async fn put(&self, key: &str, content: Bytes) -> AppResult<String> {
        let path = self.resolve(key)?;
        self.ensure_parent(&path).await?;
        fs::write(&path, &content).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to write blob: {key}"), e)
        })?;
        debug!(key, bytes = content.len(), "Wrote blob");
        Ok(content_tag(&content))
    }

    async fn copy(&self, src: &str, dst: &str) -> AppResult<String> {
        let from = self.resolve(src)?;
        let to = self.resolve(dst)?;
        let content = fs::read(&from).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to read blob: {src}"), e)
        })?;
        self.ensure_parent(&to).await?;
        fs::write(&to, &content).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to copy {src} -> {dst}"),
                e,
            )
        })?;
        debug!(src, dst, "Copied blob");
        Ok(content_tag(&content))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete blob: {key}"),
                e,
            )),
        }
    }

    async fn list(&self, prefix: &str) -> AppResult<Vec<String>> {
        let start = match prefix.rfind('/') {
            Some(i) => self.dir_path(prefix[..i].split('/').filter(|s| !s.is_empty())),
            None => self.root.clone(),
        };
        let mut keys: Vec<String> = self
            .walk(start)
            .await?
            .iter()
            .filter_map(|p| self.key_for(p))
            .filter(|k| k.starts_with(prefix))
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let path = self.resolve(key)?;
        Ok(fs::metadata(&path).await.is_ok_and(|m| m.is_file()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> (tempfile::TempDir, LocalBlobStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_put_copy_delete() {
        let (_dir, store) = store().await;

        let tag = store
            .put("alice/docs/a.txt", Bytes::from("hello"))
            .await
            .unwrap();
        assert_eq!(tag, content_tag(b"hello"));

        let copied = store.copy("alice/docs/a.txt", "alice/b.txt").await.unwrap();
        assert_eq!(copied, tag);
        assert!(store.exists("alice/b.txt").await.unwrap());

        store.delete("alice/docs/a.txt").await.unwrap();
        assert!(!store.exists("alice/docs/a.txt").await.unwrap());
        store.delete("alice/docs/a.txt").await.unwrap();
    }

    #[tokio::test]
    async fn test_markers_round_trip_through_list() {
        let (_dir, store) = store().await;

        store.put("alice/docs/", Bytes::from("marker")).await.unwrap();
        store.put("alice/docs/2024/", Bytes::from("marker")).await.unwrap();
        store.put("alice/docs/2024/r.pdf", Bytes::from("pdf")).await.unwrap();
        store.put("bob/x.txt", Bytes::from("x")).await.unwrap();

        assert!(store.exists("alice/docs/").await.unwrap());
        let keys = store.list("alice/").await.unwrap();
        assert_eq!(
            keys,
            vec!["alice/docs/", "alice/docs/2024/", "alice/docs/2024/r.pdf"]
        );
        assert_eq!(store.list("alice/docs/2024/").await.unwrap().len(), 2);
        assert!(store.list("carol/").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let (_dir, store) = store().await;
        assert!(store.put("alice/../x", Bytes::from("x")).await.is_err());
        assert!(store.put("alice//x", Bytes::from("x")).await.is_err());
    }

    #[tokio::test]
    async fn test_marker_and_root_file_share_a_name() {
        let (_first_dir, marker_first) = store().await;
        marker_first.put("alice/docs/", Bytes::from("marker")).await.unwrap();
        marker_first.put("alice/docs", Bytes::from("file")).await.unwrap();

        let (_second_dir, reversed) = store().await;
        reversed.put("alice/docs", Bytes::from("file")).await.unwrap();
        reversed.put("alice/docs/", Bytes::from("marker")).await.unwrap();

        for s in [&marker_first, &reversed] {
            assert_eq!(s.list("alice/").await.unwrap(), vec!["alice/docs", "alice/docs/"]);
            assert!(s.exists("alice/docs").await.unwrap());
            assert!(s.exists("alice/docs/").await.unwrap());
        }

        reversed.delete("alice/docs").await.unwrap();
        assert_eq!(reversed.list("alice/").await.unwrap(), vec!["alice/docs/"]);
    }

    #[tokio::test]
    async fn test_reserved_looking_names_are_plain_keys() {
        let (_dir, store) = store().await;
        store.put("alice/a.blob/", Bytes::from("marker")).await.unwrap();
        store.put("alice/a", Bytes::from("a")).await.unwrap();
        store.put(&format!("alice/{MARKER_FILE}"), Bytes::from("m")).await.unwrap();

        assert_eq!(
            store.list("alice/").await.unwrap(),
            vec![
                format!("alice/{MARKER_FILE}"),
                "alice/a".to_string(),
                "alice/a.blob/".to_string(),
            ]
        );
    }
}
