//! File entity model.

use cabinet_core::types::{FileId, FolderId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A file whose bytes live in the blob store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// The file name (including extension).
    pub name: String,
    /// File size in bytes.
    pub size: i64,
    /// Username of the owner.
    pub owner: String,
    /// Enclosing folder (null when the file sits at the root).
    pub parent_folder: Option<FolderId>,
    /// Blob store key currently holding the bytes.
    pub storage_key: String,
    /// Tag returned by the blob store write.
    pub integrity_tag: String,
    /// When the file was uploaded.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The file name.
    pub name: String,
    /// Size in bytes.
    pub size: i64,
    /// Owner username.
    pub owner: String,
    /// Enclosing folder (None for root).
    pub parent_folder: Option<FolderId>,
    /// Blob store key.
    pub storage_key: String,
    /// Tag returned by the blob store write.
    pub integrity_tag: String,
}
