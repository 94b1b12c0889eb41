//! Folder entity model.

use cabinet_core::types::FolderId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A folder or subfolder in an owner's hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Username of the owner.
    pub owner: String,
    /// Enclosing folder (null for top-level folders).
    pub parent_folder: Option<FolderId>,
    /// Blob store marker key, ending in `/`.
    pub storage_key: String,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// Owner username.
    pub owner: String,
    /// Enclosing folder (None for top-level).
    pub parent_folder: Option<FolderId>,
    /// Blob store marker key.
    pub storage_key: String,
}
