//! PostgreSQL [`CatalogStore`].

use async_trait::async_trait;

use cabinet_core::result::AppResult;
use cabinet_core::types::FolderId;
use cabinet_entity::file::{CreateFile, File};
use cabinet_entity::folder::{CreateFolder, Folder};

use super::{FileRepository, FolderRepository};
use crate::connection::DatabasePool;
use crate::store::{BlobLocation, CatalogStore};

/// Catalog backed by the `folders` and `files` tables.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    db: DatabasePool,
    folders: FolderRepository,
    files: FileRepository,
}

impl PgCatalogStore {
    /// Build the catalog on a shared pool.
    pub fn new(db: DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            db,
            folders: FolderRepository::new(pool.clone()),
            files: FileRepository::new(pool),
        }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn find_folder(
        &self,
        owner: &str,
        name: &str,
        parent: Option<FolderId>,
    ) -> AppResult<Option<Folder>> {
        self.folders.find(owner, name, parent).await
    }

    async fn find_file(
        &self,
        owner: &str,
        name: &str,
        parent: Option<FolderId>,
    ) -> AppResult<Option<File>> {
        self.files.find(owner, name, parent).await
    }

    async fn insert_folder(&self, data: &CreateFolder) -> AppResult<Folder> {
        self.folders.create(data).await
    }

    async fn insert_file(&self, data: &CreateFile) -> AppResult<File> {
        self.files.create(data).await
    }

    async fn delete_file(
        &self,
        owner: &str,
        name: &str,
        parent: Option<FolderId>,
    ) -> AppResult<bool> {
        self.files.delete(owner, name, parent).await
    }

    async fn rename_file(
        &self,
        owner: &str,
        old_name: &str,
        new_name: &str,
        parent: Option<FolderId>,
        location: BlobLocation<'_>,
    ) -> AppResult<bool> {
        self.files
            .rename(owner, old_name, new_name, parent, location)
            .await
    }

    async fn move_file(
        &self,
        owner: &str,
        name: &str,
        from: Option<FolderId>,
        to: Option<FolderId>,
        location: BlobLocation<'_>,
    ) -> AppResult<bool> {
        self.files.relocate(owner, name, from, to, location).await
    }

    async fn delete_folder(&self, owner: &str, id: FolderId) -> AppResult<bool> {
        self.folders.delete(owner, id).await
    }

    async fn delete_owner(&self, owner: &str) -> AppResult<u64> {
        let files = self.files.delete_by_owner(owner).await?;
        let folders = self.folders.delete_by_owner(owner).await?;
        Ok(files + folders)
    }

    async fn list_folders(&self) -> AppResult<Vec<Folder>> {
        self.folders.find_all().await
    }

    async fn list_files(&self) -> AppResult<Vec<File>> {
        self.files.find_all().await
    }

    async fn list_folders_by_owner(&self, owner: &str) -> AppResult<Vec<Folder>> {
        self.folders.find_by_owner(owner).await
    }

    async fn list_files_by_owner(&self, owner: &str) -> AppResult<Vec<File>> {
        self.files.find_by_owner(owner).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.db.health_check().await
    }
}
