//! Folder repository implementation.

use sqlx::PgPool;

use cabinet_core::result::AppResult;
use cabinet_core::types::FolderId;
use cabinet_entity::folder::{CreateFolder, Folder};

use super::{map_error, map_write_error};

/// Repository for folder rows.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an owner's folder by name under `parent`.
    ///
    /// The unique constraint allows at most one match; should the table
    /// ever hold more, the oldest row wins.
    pub async fn find(
        &self,
        owner: &str,
        name: &str,
        parent: Option<FolderId>,
    ) -> AppResult<Option<Folder>> {
        let mut rows = sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders \
             WHERE owner = $1 AND name = $2 AND parent_folder IS NOT DISTINCT FROM $3 \
             ORDER BY created_at ASC, id ASC LIMIT 2",
        )
        .bind(owner)
        .bind(name)
        .bind(parent)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_error(e, "Failed to find folder"))?;

        if rows.len() > 1 {
            tracing::warn!(owner, name, "Multiple folder rows share a name and parent");
        }
        Ok(if rows.is_empty() { None } else { Some(rows.swap_remove(0)) })
    }

    /// Create a new folder.
    pub async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (id, name, owner, parent_folder, storage_key) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(FolderId::new())
        .bind(&data.name)
        .bind(&data.owner)
        .bind(data.parent_folder)
        .bind(&data.storage_key)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(e, "Failed to create folder", || {
                format!("Folder ({}) already exists", data.name)
            })
        })
    }

    /// Delete a folder. Subfolders and files go with it through the
    /// `ON DELETE CASCADE` foreign keys.
    pub async fn delete(&self, owner: &str, id: FolderId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1 AND owner = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(|e| map_error(e, "Failed to delete folder"))?;
        Ok(result.rows_affected() == 1)
    }

    /// Delete every folder of an owner.
    pub async fn delete_by_owner(&self, owner: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM folders WHERE owner = $1")
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(|e| map_error(e, "Failed to delete folders by owner"))?;
        Ok(result.rows_affected())
    }

    /// List every folder.
    pub async fn find_all(&self) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders ORDER BY created_at ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_error(e, "Failed to list folders"))
    }

    /// List an owner's folders.
    pub async fn find_by_owner(&self, owner: &str) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE owner = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_error(e, "Failed to list folders by owner"))
    }
}
