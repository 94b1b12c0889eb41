//! Store traits consumed by the service layer.
//!
//! Services hold these as `Arc<dyn CatalogStore>` / `Arc<dyn UserStore>`
//! so the PostgreSQL implementations and the in-memory ones are
//! interchangeable.

use async_trait::async_trait;

use cabinet_core::result::AppResult;
use cabinet_core::types::FolderId;
use cabinet_entity::file::{CreateFile, File};
use cabinet_entity::folder::{CreateFolder, Folder};
use cabinet_entity::user::{CreateUser, User};

/// New blob location of a file after a copy.
#[derive(Debug, Clone, Copy)]
pub struct BlobLocation<'a> {
    /// Blob store key.
    pub storage_key: &'a str,
    /// Tag returned by the blob store.
    pub integrity_tag: &'a str,
}

/// Persistence of the folder/file hierarchy.
///
/// Every lookup and mutation is scoped to an owner. `parent` is `None` for
/// the root level. Inserting a name that is already taken at the same
/// level fails with `AlreadyExists`; mutations that match no row return
/// `false` instead of failing.
#[async_trait]
pub trait CatalogStore: Send + Sync + std::fmt::Debug + 'static {
    /// Look up a folder by name under `parent`.
    async fn find_folder(
        &self,
        owner: &str,
        name: &str,
        parent: Option<FolderId>,
    ) -> AppResult<Option<Folder>>;

    /// Look up a file by name under `parent`.
    async fn find_file(
        &self,
        owner: &str,
        name: &str,
        parent: Option<FolderId>,
    ) -> AppResult<Option<File>>;

    /// Insert a folder row.
    async fn insert_folder(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Insert a file row.
    async fn insert_file(&self, data: &CreateFile) -> AppResult<File>;

    /// Delete a file row. True iff exactly one row was removed.
    async fn delete_file(&self, owner: &str, name: &str, parent: Option<FolderId>)
    -> AppResult<bool>;

    /// Rename a file in place and point it at its new blob.
    async fn rename_file(
        &self,
        owner: &str,
        old_name: &str,
        new_name: &str,
        parent: Option<FolderId>,
        location: BlobLocation<'_>,
    ) -> AppResult<bool>;

    /// Move a file to another folder and point it at its new blob.
    async fn move_file(
        &self,
        owner: &str,
        name: &str,
        from: Option<FolderId>,
        to: Option<FolderId>,
        location: BlobLocation<'_>,
    ) -> AppResult<bool>;

    /// Delete a folder together with its subfolders and files.
    async fn delete_folder(&self, owner: &str, id: FolderId) -> AppResult<bool>;

    /// Delete every folder and file row of `owner`. Returns rows removed.
    async fn delete_owner(&self, owner: &str) -> AppResult<u64>;

    /// Every folder row, oldest first.
    async fn list_folders(&self) -> AppResult<Vec<Folder>>;

    /// Every file row, oldest first.
    async fn list_files(&self) -> AppResult<Vec<File>>;

    /// Folders owned by `owner`, oldest first.
    async fn list_folders_by_owner(&self, owner: &str) -> AppResult<Vec<Folder>>;

    /// Files owned by `owner`, oldest first.
    async fn list_files_by_owner(&self, owner: &str) -> AppResult<Vec<File>>;

    /// Check that the backing store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Persistence of registered users.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a user. A taken username or email fails with `AlreadyExists`.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Find a user by exact username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Every user, oldest first.
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Delete a user and return the removed row.
    async fn delete_by_username(&self, username: &str) -> AppResult<Option<User>>;
}
