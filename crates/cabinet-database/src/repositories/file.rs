//! File repository implementation.

use sqlx::PgPool;

use cabinet_core::result::AppResult;
use cabinet_core::types::{FileId, FolderId};
use cabinet_entity::file::{CreateFile, File};

use super::{map_error, map_write_error};
use crate::store::BlobLocation;

/// Repository for file rows.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an owner's file by name under `parent`.
    pub async fn find(
        &self,
        owner: &str,
        name: &str,
        parent: Option<FolderId>,
    ) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files \
             WHERE owner = $1 AND name = $2 AND parent_folder IS NOT DISTINCT FROM $3 \
             ORDER BY created_at ASC, id ASC LIMIT 1",
        )
        .bind(owner)
        .bind(name)
        .bind(parent)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_error(e, "Failed to find file"))
    }

    /// Create a new file record.
    pub async fn create(&self, data: &CreateFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files (id, name, size, owner, parent_folder, storage_key, integrity_tag) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(FileId::new())
        .bind(&data.name)
        .bind(data.size)
        .bind(&data.owner)
        .bind(data.parent_folder)
        .bind(&data.storage_key)
        .bind(&data.integrity_tag)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(e, "Failed to create file", || {
                format!("File ({}) already exists", data.name)
            })
        })
    }

    /// Delete a file by name.
    pub async fn delete(&self, owner: &str, name: &str, parent: Option<FolderId>) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM files \
             WHERE owner = $1 AND name = $2 AND parent_folder IS NOT DISTINCT FROM $3",
        )
        .bind(owner)
        .bind(name)
        .bind(parent)
        .execute(&self.pool)
        .await
        .map_err(|e| map_error(e, "Failed to delete file"))?;
        Ok(result.rows_affected() == 1)
    }

    /// Rename a file within its folder.
    pub async fn rename(
        &self,
        owner: &str,
        old_name: &str,
        new_name: &str,
        parent: Option<FolderId>,
        location: BlobLocation<'_>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE files SET name = $1, storage_key = $2, integrity_tag = $3 \
             WHERE owner = $4 AND name = $5 AND parent_folder IS NOT DISTINCT FROM $6",
        )
        .bind(new_name)
        .bind(location.storage_key)
        .bind(location.integrity_tag)
        .bind(owner)
        .bind(old_name)
        .bind(parent)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(e, "Failed to rename file", || {
                format!("File ({new_name}) already exists")
            })
        })?;
        Ok(result.rows_affected() == 1)
    }

    /// Move a file to another folder.
    pub async fn relocate(
        &self,
        owner: &str,
        name: &str,
        from: Option<FolderId>,
        to: Option<FolderId>,
        location: BlobLocation<'_>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE files SET parent_folder = $1, storage_key = $2, integrity_tag = $3 \
             WHERE owner = $4 AND name = $5 AND parent_folder IS NOT DISTINCT FROM $6",
        )
        .bind(to)
        .bind(location.storage_key)
        .bind(location.integrity_tag)
        .bind(owner)
        .bind(name)
        .bind(from)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(e, "Failed to move file", || {
                format!("File ({name}) already exists in the destination")
            })
        })?;
        Ok(result.rows_affected() == 1)
    }

    /// Delete every file of an owner.
    pub async fn delete_by_owner(&self, owner: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM files WHERE owner = $1")
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(|e| map_error(e, "Failed to delete files by owner"))?;
        Ok(result.rows_affected())
    }

    /// List every file.
    pub async fn find_all(&self) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files ORDER BY created_at ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_error(e, "Failed to list files"))
    }

    /// List an owner's files.
    pub async fn find_by_owner(&self, owner: &str) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE owner = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_error(e, "Failed to list files by owner"))
    }
}
