//! Maps folder name chains to catalog ids.

use std::sync::Arc;

use cabinet_core::error::AppError;
use cabinet_core::result::AppResult;
use cabinet_core::types::{FolderId, FolderPath};
use cabinet_database::CatalogStore;

use crate::deadline::Deadlines;

/// Resolves `folder` and `folder/sub` chains for one owner.
///
/// Read-only. Each segment is looked up under the id of the segment before
/// it, always filtered by owner, so two users' folders with the same name
/// never collide.
#[derive(Debug, Clone)]
pub struct PathResolver {
    catalog: Arc<dyn CatalogStore>,
    deadlines: Deadlines,
}

impl PathResolver {
    /// Creates a new resolver.
    pub fn new(catalog: Arc<dyn CatalogStore>, deadlines: Deadlines) -> Self {
        Self { catalog, deadlines }
    }

    /// Resolve a top-level folder.
    pub async fn resolve_folder(&self, owner: &str, name: &str) -> AppResult<FolderId> {
        self.lookup(owner, name, None)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Parent folder ({name}/) does not exist")))
    }

    /// Resolve a subfolder. The parent must resolve first.
    pub async fn resolve_subfolder(
        &self,
        owner: &str,
        sub: &str,
        parent: &str,
    ) -> AppResult<FolderId> {
        let parent_id = self.resolve_folder(owner, parent).await?;
        self.lookup(owner, sub, Some(parent_id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("{sub}/ does not exist in {parent}/")))
    }

    /// Resolve a whole path. The root resolves to `None`.
    pub async fn resolve_path(&self, owner: &str, path: &FolderPath) -> AppResult<Option<FolderId>> {
        match path.segments() {
            [] => Ok(None),
            [folder] => self.resolve_folder(owner, folder).await.map(Some),
            [folder, sub] => self.resolve_subfolder(owner, sub, folder).await.map(Some),
            _ => Err(AppError::validation(format!(
                "Path ({path}) is deeper than {} levels",
                FolderPath::MAX_DEPTH
            ))),
        }
    }

    async fn lookup(
        &self,
        owner: &str,
        name: &str,
        parent: Option<FolderId>,
    ) -> AppResult<Option<FolderId>> {
        let folder = self
            .deadlines
            .catalog("folder lookup", self.catalog.find_folder(owner, name, parent))
            .await?;
        Ok(folder.map(|f| f.id))
    }
}
