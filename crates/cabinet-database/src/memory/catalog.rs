//! In-memory [`CatalogStore`].

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use cabinet_core::error::AppError;
use cabinet_core::result::AppResult;
use cabinet_core::types::{FileId, FolderId};
use cabinet_entity::file::{CreateFile, File};
use cabinet_entity::folder::{CreateFolder, Folder};

use crate::store::{BlobLocation, CatalogStore};

#[derive(Debug, Default)]
struct Tables {
    folders: Vec<Folder>,
    files: Vec<File>,
}

impl Tables {
    fn folder_taken(&self, owner: &str, name: &str, parent: Option<FolderId>) -> bool {
        self.folders
            .iter()
            .any(|f| f.owner == owner && f.name == name && f.parent_folder == parent)
    }

    fn file_position(&self, owner: &str, name: &str, parent: Option<FolderId>) -> Option<usize> {
        self.files
            .iter()
            .position(|f| f.owner == owner && f.name == name && f.parent_folder == parent)
    }
}

/// Catalog kept in process memory.
///
/// Rows live in insertion order, which doubles as creation order.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    tables: Mutex<Tables>,
    fail_writes: AtomicBool,
    stale_files: Mutex<HashSet<(String, Option<FolderId>)>>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every mutation fail with a database error until reset.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make `find_file` miss file `name` under `parent`, as a lookup that
    /// ran before a concurrent insert would.
    pub fn set_stale_file(&self, name: &str, parent: Option<FolderId>) {
        self.stale_files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((name.to_string(), parent));
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_writable(&self) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::database("Catalog is unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn find_folder(
        &self,
        owner: &str,
        name: &str,
        parent: Option<FolderId>,
    ) -> AppResult<Option<Folder>> {
        Ok(self
            .tables()
            .folders
            .iter()
            .find(|f| f.owner == owner && f.name == name && f.parent_folder == parent)
            .cloned())
    }

    async fn find_file(
        &self,
        owner: &str,
        name: &str,
        parent: Option<FolderId>,
    ) -> AppResult<Option<File>> {
        if self
            .stale_files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&(name.to_string(), parent))
        {
            return Ok(None);
        }
        let tables = self.tables();
        Ok(tables
            .file_position(owner, name, parent)
            .map(|i| tables.files[i].clone()))
    }

    async fn insert_folder(&self, data: &CreateFolder) -> AppResult<Folder> {
        self.check_writable()?;
        let mut tables = self.tables();
        if tables.folder_taken(&data.owner, &data.name, data.parent_folder) {
            return Err(AppError::already_exists(format!(
                "Folder ({}) already exists",
                data.name
            )));
        }
        if let Some(parent) = data.parent_folder {
            if !tables.folders.iter().any(|f| f.id == parent) {
                return Err(AppError::database("Parent folder row does not exist"));
            }
        }
        let folder = Folder {
            id: FolderId::new(),
            name: data.name.clone(),
            owner: data.owner.clone(),
            parent_folder: data.parent_folder,
            storage_key: data.storage_key.clone(),
            created_at: Utc::now(),
        };
        tables.folders.push(folder.clone());
        Ok(folder)
    }

    async fn insert_file(&self, data: &CreateFile) -> AppResult<File> {
        self.check_writable()?;
        let mut tables = self.tables();
        if tables
            .file_position(&data.owner, &data.name, data.parent_folder)
            .is_some()
        {
            return Err(AppError::already_exists(format!(
                "File ({}) already exists",
                data.name
            )));
        }
        let file = File {
            id: FileId::new(),
            name: data.name.clone(),
            size: data.size,
            owner: data.owner.clone(),
            parent_folder: data.parent_folder,
            storage_key: data.storage_key.clone(),
            integrity_tag: data.integrity_tag.clone(),
            created_at: Utc::now(),
        };
        tables.files.push(file.clone());
        Ok(file)
    }

    async fn delete_file(
        &self,
        owner: &str,
        name: &str,
        parent: Option<FolderId>,
    ) -> AppResult<bool> {
        self.check_writable()?;
        let mut tables = self.tables();
        match tables.file_position(owner, name, parent) {
            Some(i) => {
                tables.files.remove(i);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn rename_file(
        &self,
        owner: &str,
        old_name: &str,
        new_name: &str,
        parent: Option<FolderId>,
        location: BlobLocation<'_>,
    ) -> AppResult<bool> {
        self.check_writable()?;
        let mut tables = self.tables();
        let Some(i) = tables.file_position(owner, old_name, parent) else {
            return Ok(false);
        };
        if old_name != new_name && tables.file_position(owner, new_name, parent).is_some() {
            return Err(AppError::already_exists(format!(
                "File ({new_name}) already exists"
            )));
        }
        let file = &mut tables.files[i];
        file.name = new_name.to_string();
        file.storage_key = location.storage_key.to_string();
        file.integrity_tag = location.integrity_tag.to_string();
        Ok(true)
    }

    async fn move_file(
        &self,
        owner: &str,
        name: &str,
        from: Option<FolderId>,
        to: Option<FolderId>,
        location: BlobLocation<'_>,
    ) -> AppResult<bool> {
        self.check_writable()?;
        let mut tables = self.tables();
        let Some(i) = tables.file_position(owner, name, from) else {
            return Ok(false);
        };
        if from != to && tables.file_position(owner, name, to).is_some() {
            return Err(AppError::already_exists(format!(
                "File ({name}) already exists in the destination"
            )));
        }
        let file = &mut tables.files[i];
        file.parent_folder = to;
        file.storage_key = location.storage_key.to_string();
        file.integrity_tag = location.integrity_tag.to_string();
        Ok(true)
    }

    async fn delete_folder(&self, owner: &str, id: FolderId) -> AppResult<bool> {
        self.check_writable()?;
        let mut tables = self.tables();
        if !tables.folders.iter().any(|f| f.id == id && f.owner == owner) {
            return Ok(false);
        }

        let mut doomed: HashSet<FolderId> = HashSet::from([id]);
        loop {
            let before = doomed.len();
            for folder in &tables.folders {
                if folder.parent_folder.is_some_and(|p| doomed.contains(&p)) {
                    doomed.insert(folder.id);
                }
            }
            if doomed.len() == before {
                break;
            }
        }

        tables.folders.retain(|f| !doomed.contains(&f.id));
        tables
            .files
            .retain(|f| !f.parent_folder.is_some_and(|p| doomed.contains(&p)));
        Ok(true)
    }

    async fn delete_owner(&self, owner: &str) -> AppResult<u64> {
        self.check_writable()?;
        let mut tables = self.tables();
        let before = tables.folders.len() + tables.files.len();
        tables.folders.retain(|f| f.owner != owner);
        tables.files.retain(|f| f.owner != owner);
        Ok((before - tables.folders.len() - tables.files.len()) as u64)
    }

    async fn list_folders(&self) -> AppResult<Vec<Folder>> {
        Ok(self.tables().folders.clone())
    }

    async fn list_files(&self) -> AppResult<Vec<File>> {
        Ok(self.tables().files.clone())
    }

    async fn list_folders_by_owner(&self, owner: &str) -> AppResult<Vec<Folder>> {
        Ok(self
            .tables()
            .folders
            .iter()
            .filter(|f| f.owner == owner)
            .cloned()
            .collect())
    }

    async fn list_files_by_owner(&self, owner: &str) -> AppResult<Vec<File>> {
        Ok(self
            .tables()
            .files
            .iter()
            .filter(|f| f.owner == owner)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cabinet_core::error::ErrorKind;

    use super::*;

    fn folder(name: &str, owner: &str, parent: Option<FolderId>) -> CreateFolder {
        CreateFolder {
            name: name.to_string(),
            owner: owner.to_string(),
            parent_folder: parent,
            storage_key: format!("{owner}/{name}/"),
        }
    }

    fn file(name: &str, owner: &str, parent: Option<FolderId>) -> CreateFile {
        CreateFile {
            name: name.to_string(),
            size: 3,
            owner: owner.to_string(),
            parent_folder: parent,
            storage_key: format!("{owner}/{name}"),
            integrity_tag: "tag".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_top_level_folder_is_rejected() {
        let catalog = MemoryCatalog::new();
        catalog.insert_folder(&folder("docs", "alice", None)).await.expect("first");
        let err = catalog
            .insert_folder(&folder("docs", "alice", None))
            .await
            .expect_err("duplicate");
        assert_eq!(err.kind, ErrorKind::AlreadyExists);

        catalog.insert_folder(&folder("docs", "bob", None)).await.expect("other owner");
        assert_eq!(catalog.list_folders().await.expect("list").len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_leave_one_row() {
        let catalog = Arc::new(MemoryCatalog::new());
        let tasks = (0..8).map(|_| {
            let catalog = Arc::clone(&catalog);
            tokio::spawn(async move { catalog.insert_folder(&folder("docs", "alice", None)).await })
        });
        let results = futures::future::join_all(tasks).await;
        let created = results
            .into_iter()
            .filter(|r| matches!(r, Ok(Ok(_))))
            .count();
        assert_eq!(created, 1);
        assert_eq!(catalog.list_folders_by_owner("alice").await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn test_delete_folder_cascades() {
        let catalog = MemoryCatalog::new();
        let docs = catalog.insert_folder(&folder("docs", "alice", None)).await.expect("docs");
        let sub = catalog
            .insert_folder(&folder("2024", "alice", Some(docs.id)))
            .await
            .expect("sub");
        catalog.insert_file(&file("a.txt", "alice", Some(sub.id))).await.expect("nested");
        catalog.insert_file(&file("b.txt", "alice", None)).await.expect("root");

        assert!(!catalog.delete_folder("bob", docs.id).await.expect("wrong owner"));
        assert!(catalog.delete_folder("alice", docs.id).await.expect("delete"));
        assert!(catalog.list_folders().await.expect("folders").is_empty());
        let files = catalog.list_files().await.expect("files");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "b.txt");
    }

    #[tokio::test]
    async fn test_missing_rows_report_false() {
        let catalog = MemoryCatalog::new();
        let location = BlobLocation {
            storage_key: "alice/x",
            integrity_tag: "t",
        };
        assert!(!catalog.delete_file("alice", "x", None).await.expect("delete"));
        assert!(!catalog.rename_file("alice", "x", "y", None, location).await.expect("rename"));
        assert!(!catalog.move_file("alice", "x", None, None, location).await.expect("move"));
    }

    #[tokio::test]
    async fn test_stale_file_lookup_still_enforces_uniqueness() {
        let catalog = MemoryCatalog::new();
        catalog.insert_file(&file("a.txt", "alice", None)).await.expect("insert");
        catalog.set_stale_file("a.txt", None);
        assert!(catalog.find_file("alice", "a.txt", None).await.expect("find").is_none());
        let err = catalog
            .insert_file(&file("a.txt", "alice", None))
            .await
            .expect_err("duplicate");
        assert_eq!(err.kind, cabinet_core::error::ErrorKind::AlreadyExists);
    }

    #[tokio::test]
    async fn test_fail_writes() {
        let catalog = MemoryCatalog::new();
        catalog.set_fail_writes(true);
        let err = catalog
            .insert_file(&file("a.txt", "alice", None))
            .await
            .expect_err("unavailable");
        assert!(err.is_storage_fault());
        catalog.set_fail_writes(false);
        catalog.insert_file(&file("a.txt", "alice", None)).await.expect("recovered");
    }
}
