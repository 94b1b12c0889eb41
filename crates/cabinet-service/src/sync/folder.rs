//! Folder operations.

use bytes::Bytes;
use chrono::Utc;
use tracing::warn;

use cabinet_core::error::{AppError, ErrorKind};
use cabinet_core::result::AppResult;
use cabinet_core::types::{FolderPath, ObjectKey, validate_name};
use cabinet_entity::folder::{CreateFolder, Folder};

use crate::context::RequestContext;
use crate::path::PathRole;
use crate::sync::compensation::Compensation;
use crate::sync::orchestrator::{SyncOrchestrator, record_out_of_sync};
use crate::sync::state::{SyncOp, SyncStage, SyncTrace};

impl SyncOrchestrator {
    /// Create folder `name` inside `parent` (the root for a top-level
    /// folder, or a top-level folder for a subfolder).
    ///
    /// Writes the marker object `owner/[parent/]name/`, then the row.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent: &FolderPath,
    ) -> AppResult<Folder> {
        let mut trace = SyncTrace::begin(SyncOp::CreateFolder, ctx.owner());
        let result = self.create_folder_steps(ctx, name, parent, &mut trace).await;
        trace.settle(result)
    }

    async fn create_folder_steps(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent: &FolderPath,
        trace: &mut SyncTrace,
    ) -> AppResult<Folder> {
        let owner = ctx.owner();
        validate_name(name)?;
        let path = parent.child(name)?;
        let parent_id = self
            .guard
            .require_path(owner, parent, PathRole::Parent)
            .await?;
        self.guard
            .require_folder_absent(owner, name, parent_id, parent)
            .await?;

        trace.advance(SyncStage::RemoteMutating);
        let key = ObjectKey::folder_marker(owner, &path).into_string();
        let marker = Bytes::from(format!("{}-{name}", Utc::now().timestamp_millis()));
        self.deadlines
            .blob("blob put", self.blobs.put(&key, marker))
            .await?;

        trace.advance(SyncStage::LocalMutating);
        let row = CreateFolder {
            name: name.to_string(),
            owner: owner.to_string(),
            parent_folder: parent_id,
            storage_key: key.clone(),
        };
        match self
            .deadlines
            .catalog("folder insert", self.catalog.insert_folder(&row))
            .await
        {
            Ok(folder) => Ok(folder),
            // A concurrent create won the row and shares this marker key.
            Err(e) if e.kind == ErrorKind::AlreadyExists => Err(e),
            Err(e) => {
                trace.advance(SyncStage::Compensating);
                Err(self
                    .compensate(trace.op(), owner, Compensation::DeleteBlob { key }, e)
                    .await)
            }
        }
    }

    /// Delete the folder at `path` with its subfolders and files.
    ///
    /// Removes every blob under the folder's prefix, deepest first, then
    /// the row; the catalog cascade removes the rows below it. Returns the
    /// number of blobs removed.
    pub async fn delete_folder(&self, ctx: &RequestContext, path: &FolderPath) -> AppResult<usize> {
        let mut trace = SyncTrace::begin(SyncOp::DeleteFolder, ctx.owner());
        let result = self.delete_folder_steps(ctx, path, &mut trace).await;
        trace.settle(result)
    }

    async fn delete_folder_steps(
        &self,
        ctx: &RequestContext,
        path: &FolderPath,
        trace: &mut SyncTrace,
    ) -> AppResult<usize> {
        let owner = ctx.owner();
        let folder_id = self
            .guard
            .require_path(owner, path, PathRole::Folder)
            .await?
            .ok_or_else(|| AppError::validation("The root level cannot be deleted"))?;

        trace.advance(SyncStage::RemoteMutating);
        let prefix = ObjectKey::folder_marker(owner, path).into_string();
        let mut keys = self
            .deadlines
            .blob("blob list", self.blobs.list(&prefix))
            .await?;
        // Children sort after their folder marker, so reverse order puts
        // every marker after its contents.
        keys.sort_unstable_by(|a, b| b.cmp(a));

        let mut removed = 0;
        for key in &keys {
            if let Err(e) = self
                .deadlines
                .blob("blob delete", self.blobs.delete(key))
                .await
            {
                if removed == 0 {
                    return Err(e);
                }
                let progress = AppError::storage(format!(
                    "Removed {removed} of {} objects under {prefix}",
                    keys.len()
                ));
                record_out_of_sync(trace.op(), owner, key, &e, &progress);
                return Err(AppError::partial_failure(format!(
                    "Folder ({path}) was only partly deleted: {}",
                    e.message
                )));
            }
            removed += 1;
        }

        trace.advance(SyncStage::LocalMutating);
        match self
            .deadlines
            .catalog("folder delete", self.catalog.delete_folder(owner, folder_id))
            .await
        {
            Ok(true) => Ok(removed),
            Ok(false) => {
                warn!(owner, %path, "Folder row vanished before delete");
                Ok(removed)
            }
            Err(e) => {
                trace.advance(SyncStage::Compensating);
                Err(self
                    .compensate(trace.op(), owner, Compensation::Impossible { key: prefix }, e)
                    .await)
            }
        }
    }
}
