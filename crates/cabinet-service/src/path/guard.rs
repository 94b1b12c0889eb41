//! Pre-flight presence and absence checks.
//!
//! Every orchestrated operation runs these before touching the blob store.
//! Missing things fail with `NotFound`, taken names with `AlreadyExists`,
//! each with a message specific to the operation.

use std::sync::Arc;

use cabinet_core::error::{AppError, ErrorKind};
use cabinet_core::result::AppResult;
use cabinet_core::types::{FolderId, FolderPath};
use cabinet_database::CatalogStore;
use cabinet_entity::file::File;

use crate::deadline::Deadlines;
use crate::path::resolver::PathResolver;

/// What a folder path is being resolved for. Picks the `NotFound` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRole {
    /// Parent of a folder about to be created.
    Parent,
    /// Destination of an upload.
    Upload,
    /// Folder holding the file being deleted or renamed, or being deleted.
    Folder,
    /// Source folder of a move.
    Source,
    /// Target folder of a move.
    Target,
}

/// Existence checks on top of the [`PathResolver`].
#[derive(Debug, Clone)]
pub struct ExistenceGuard {
    resolver: PathResolver,
    catalog: Arc<dyn CatalogStore>,
    deadlines: Deadlines,
}

fn location(path: &FolderPath) -> String {
    if path.is_root() {
        "at root level".to_string()
    } else {
        format!("in folder({path})")
    }
}

impl ExistenceGuard {
    /// Creates a new guard.
    pub fn new(catalog: Arc<dyn CatalogStore>, deadlines: Deadlines) -> Self {
        Self {
            resolver: PathResolver::new(Arc::clone(&catalog), deadlines),
            catalog,
            deadlines,
        }
    }

    /// The resolver this guard checks through.
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Whether `owner` has a top-level folder `name`.
    pub async fn folder_exists(&self, owner: &str, name: &str) -> AppResult<bool> {
        absent_is_false(self.resolver.resolve_folder(owner, name).await)
    }

    /// Whether `owner` has a subfolder `sub` inside folder `parent`.
    pub async fn subfolder_exists(&self, owner: &str, sub: &str, parent: &str) -> AppResult<bool> {
        absent_is_false(self.resolver.resolve_subfolder(owner, sub, parent).await)
    }

    /// Whether `owner` has a file `name` at `path`. A missing folder on the
    /// way counts as "no such file".
    pub async fn file_exists(&self, owner: &str, name: &str, path: &FolderPath) -> AppResult<bool> {
        let parent = match self.resolver.resolve_path(owner, path).await {
            Ok(parent) => parent,
            Err(e) if e.kind == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };
        Ok(self.find_file(owner, name, parent).await?.is_some())
    }

    /// Resolve `path`, failing with a message chosen by `role`.
    pub async fn require_path(
        &self,
        owner: &str,
        path: &FolderPath,
        role: PathRole,
    ) -> AppResult<Option<FolderId>> {
        match self.resolver.resolve_path(owner, path).await {
            Err(e) if e.kind == ErrorKind::NotFound => Err(match role {
                PathRole::Upload => e,
                PathRole::Parent => {
                    AppError::not_found(format!("You need to create a parent folder ({path}) first"))
                }
                PathRole::Folder => AppError::not_found(format!("There is no folder ({path})")),
                PathRole::Source => {
                    AppError::not_found(format!("There is no source folder ({path})"))
                }
                PathRole::Target => {
                    AppError::not_found(format!("There is no target folder ({path})"))
                }
            }),
            other => other,
        }
    }

    /// Fail if folder `name` is already taken under `parent`.
    pub async fn require_folder_absent(
        &self,
        owner: &str,
        name: &str,
        parent: Option<FolderId>,
        parent_path: &FolderPath,
    ) -> AppResult<()> {
        let existing = self
            .deadlines
            .catalog("folder lookup", self.catalog.find_folder(owner, name, parent))
            .await?;
        if existing.is_none() {
            return Ok(());
        }
        Err(match parent_path.leaf() {
            None => AppError::already_exists(format!("Folder ({name}) already exists")),
            Some(leaf) => AppError::already_exists(format!("{name} already exists in {leaf}")),
        })
    }

    /// Look up a file row.
    pub async fn find_file(
        &self,
        owner: &str,
        name: &str,
        parent: Option<FolderId>,
    ) -> AppResult<Option<File>> {
        self.deadlines
            .catalog("file lookup", self.catalog.find_file(owner, name, parent))
            .await
    }

    /// Return the file row, failing with `NotFound` if there is none.
    pub async fn require_file(
        &self,
        owner: &str,
        name: &str,
        parent: Option<FolderId>,
        path: &FolderPath,
    ) -> AppResult<File> {
        self.find_file(owner, name, parent).await?.ok_or_else(|| {
            AppError::not_found(format!("{name} does not exist {}", location(path)))
        })
    }

    /// Fail if a file `name` is already taken under `parent`.
    pub async fn require_file_absent(
        &self,
        owner: &str,
        name: &str,
        parent: Option<FolderId>,
        path: &FolderPath,
    ) -> AppResult<()> {
        match self.find_file(owner, name, parent).await? {
            None => Ok(()),
            Some(_) => Err(AppError::already_exists(format!(
                "{name} already exists {}",
                location(path)
            ))),
        }
    }
}

fn absent_is_false<T>(result: AppResult<T>) -> AppResult<bool> {
    match result {
        Ok(_) => Ok(true),
        Err(e) if e.kind == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
