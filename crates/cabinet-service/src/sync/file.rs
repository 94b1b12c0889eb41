//! File operations.

use bytes::Bytes;
use tracing::debug;

use cabinet_core::error::{AppError, ErrorKind};
use cabinet_core::result::AppResult;
use cabinet_core::types::{FolderPath, ObjectKey, validate_name};
use cabinet_database::store::BlobLocation;
use cabinet_entity::file::{CreateFile, File};

use crate::context::RequestContext;
use crate::path::PathRole;
use crate::sync::compensation::Compensation;
use crate::sync::orchestrator::SyncOrchestrator;
use crate::sync::state::{SyncOp, SyncStage, SyncTrace};

/// An uploaded file and where to put it.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Name to store the file under. Falls back to `original_name`.
    pub name: Option<String>,
    /// Name the client sent with the content.
    pub original_name: String,
    /// File content.
    pub content: Bytes,
    /// Top-level folder, if any.
    pub parent: Option<String>,
    /// Subfolder inside `parent`, if any.
    pub sub: Option<String>,
}

impl UploadRequest {
    /// The name the file will be stored under.
    pub fn file_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(self.original_name.trim())
    }
}

impl SyncOrchestrator {
    /// Upload a file into the root, a folder, or a subfolder.
    pub async fn upload_file(&self, ctx: &RequestContext, req: UploadRequest) -> AppResult<File> {
        let mut trace = SyncTrace::begin(SyncOp::UploadFile, ctx.owner());
        let result = self.upload_file_steps(ctx, req, &mut trace).await;
        trace.settle(result)
    }

    async fn upload_file_steps(
        &self,
        ctx: &RequestContext,
        req: UploadRequest,
        trace: &mut SyncTrace,
    ) -> AppResult<File> {
        let owner = ctx.owner();
        let path = FolderPath::from_parts(req.parent.as_deref(), req.sub.as_deref())?;
        let name = req.file_name().to_string();
        validate_name(&name)?;
        let size = i64::try_from(req.content.len())
            .map_err(|_| AppError::validation("File is too large"))?;

        let parent_id = self
            .guard
            .require_path(owner, &path, PathRole::Upload)
            .await?;
        self.guard
            .require_file_absent(owner, &name, parent_id, &path)
            .await?;

        trace.advance(SyncStage::RemoteMutating);
        let key = ObjectKey::file(owner, &path, &name).into_string();
        let tag = self
            .deadlines
            .blob("blob put", self.blobs.put(&key, req.content))
            .await?;

        trace.advance(SyncStage::LocalMutating);
        let row = CreateFile {
            name,
            size,
            owner: owner.to_string(),
            parent_folder: parent_id,
            storage_key: key.clone(),
            integrity_tag: tag,
        };
        match self
            .deadlines
            .catalog("file insert", self.catalog.insert_file(&row))
            .await
        {
            Ok(file) => Ok(file),
            // A concurrent upload won the row and shares this key.
            Err(e) if e.kind == ErrorKind::AlreadyExists => Err(e),
            Err(e) => {
                trace.advance(SyncStage::Compensating);
                Err(self
                    .compensate(trace.op(), owner, Compensation::DeleteBlob { key }, e)
                    .await)
            }
        }
    }

    /// Delete file `name` inside `path`.
    ///
    /// Returns `false` when the folder exists but holds no such file, so a
    /// repeated delete is not an error.
    pub async fn delete_file(
        &self,
        ctx: &RequestContext,
        name: &str,
        path: &FolderPath,
    ) -> AppResult<bool> {
        let mut trace = SyncTrace::begin(SyncOp::DeleteFile, ctx.owner());
        let result = self.delete_file_steps(ctx, name, path, &mut trace).await;
        trace.settle(result)
    }

    async fn delete_file_steps(
        &self,
        ctx: &RequestContext,
        name: &str,
        path: &FolderPath,
        trace: &mut SyncTrace,
    ) -> AppResult<bool> {
        let owner = ctx.owner();
        let parent_id = self
            .guard
            .require_path(owner, path, PathRole::Folder)
            .await?;
        let Some(file) = self.guard.find_file(owner, name, parent_id).await? else {
            debug!(owner, name, %path, "Nothing to delete");
            return Ok(false);
        };

        trace.advance(SyncStage::RemoteMutating);
        self.deadlines
            .blob("blob delete", self.blobs.delete(&file.storage_key))
            .await?;

        trace.advance(SyncStage::LocalMutating);
        match self
            .deadlines
            .catalog("file delete", self.catalog.delete_file(owner, name, parent_id))
            .await
        {
            Ok(deleted) => Ok(deleted),
            Err(e) => {
                trace.advance(SyncStage::Compensating);
                let action = Compensation::Impossible {
                    key: file.storage_key,
                };
                Err(self.compensate(trace.op(), owner, action, e).await)
            }
        }
    }

    /// Rename a file within `path`. The blob is copied to the new key and
    /// the old key deleted before the row changes.
    pub async fn rename_file(
        &self,
        ctx: &RequestContext,
        old_name: &str,
        new_name: &str,
        path: &FolderPath,
    ) -> AppResult<bool> {
        let mut trace = SyncTrace::begin(SyncOp::RenameFile, ctx.owner());
        let result = self
            .rename_file_steps(ctx, old_name, new_name, path, &mut trace)
            .await;
        trace.settle(result)
    }

    async fn rename_file_steps(
        &self,
        ctx: &RequestContext,
        old_name: &str,
        new_name: &str,
        path: &FolderPath,
        trace: &mut SyncTrace,
    ) -> AppResult<bool> {
        let owner = ctx.owner();
        validate_name(new_name)?;
        let parent_id = self
            .guard
            .require_path(owner, path, PathRole::Folder)
            .await?;
        let file = self
            .guard
            .require_file(owner, old_name, parent_id, path)
            .await?;
        self.guard
            .require_file_absent(owner, new_name, parent_id, path)
            .await?;

        trace.advance(SyncStage::RemoteMutating);
        let new_key = ObjectKey::file(owner, path, new_name).into_string();
        let tag = self.copy_then_delete(trace.op(), &file, &new_key).await?;

        trace.advance(SyncStage::LocalMutating);
        let location = BlobLocation {
            storage_key: &new_key,
            integrity_tag: &tag,
        };
        let outcome = self
            .deadlines
            .catalog(
                "file rename",
                self.catalog
                    .rename_file(owner, old_name, new_name, parent_id, location),
            )
            .await;
        self.settle_relocation(trace, &file, new_key.clone(), outcome)
            .await
    }

    /// Move file `name` from `from` to `to`.
    ///
    /// When `from` and `to` are the same folder the new key equals the old
    /// one, so the blob store is not touched: a copy onto itself followed by
    /// a delete would lose the content. Only the catalog update runs.
    pub async fn move_file(
        &self,
        ctx: &RequestContext,
        name: &str,
        from: &FolderPath,
        to: &FolderPath,
    ) -> AppResult<bool> {
        let mut trace = SyncTrace::begin(SyncOp::MoveFile, ctx.owner());
        let result = self.move_file_steps(ctx, name, from, to, &mut trace).await;
        trace.settle(result)
    }

    async fn move_file_steps(
        &self,
        ctx: &RequestContext,
        name: &str,
        from: &FolderPath,
        to: &FolderPath,
        trace: &mut SyncTrace,
    ) -> AppResult<bool> {
        let owner = ctx.owner();
        let from_id = self
            .guard
            .require_path(owner, from, PathRole::Source)
            .await?;
        let file = self.guard.require_file(owner, name, from_id, from).await?;
        let to_id = self
            .guard
            .require_path(owner, to, PathRole::Target)
            .await?;
        if from_id != to_id {
            self.guard
                .require_file_absent(owner, name, to_id, to)
                .await?;
        }

        trace.advance(SyncStage::RemoteMutating);
        let new_key = ObjectKey::file(owner, to, name).into_string();
        let tag = self.copy_then_delete(trace.op(), &file, &new_key).await?;

        trace.advance(SyncStage::LocalMutating);
        let location = BlobLocation {
            storage_key: &new_key,
            integrity_tag: &tag,
        };
        let outcome = self
            .deadlines
            .catalog(
                "file move",
                self.catalog.move_file(owner, name, from_id, to_id, location),
            )
            .await;
        self.settle_relocation(trace, &file, new_key.clone(), outcome)
            .await
    }

    /// Finish a rename or move once the catalog answered.
    ///
    /// A failed or zero-row update puts the blob back under its old key.
    /// When the new name was taken meanwhile the new key is left in place.
    async fn settle_relocation(
        &self,
        trace: &mut SyncTrace,
        file: &File,
        new_key: String,
        outcome: AppResult<bool>,
    ) -> AppResult<bool> {
        let unmoved = new_key == file.storage_key;
        let local_err = match outcome {
            Ok(true) => return Ok(true),
            Ok(false) if unmoved => return Ok(false),
            Ok(false) => AppError::not_found(format!("{} no longer exists", file.name)),
            Err(e) if unmoved => return Err(e),
            Err(e) => e,
        };

        trace.advance(SyncStage::Compensating);
        let vanished = local_err.kind == ErrorKind::NotFound;
        let original = file.storage_key.clone();
        let action = if local_err.kind == ErrorKind::AlreadyExists {
            // A concurrent writer took the new name and owns its key.
            Compensation::CopyBack {
                original,
                moved: new_key,
            }
        } else {
            Compensation::RestoreBlob {
                original,
                moved: new_key,
            }
        };
        let err = self
            .compensate(trace.op(), &file.owner, action, local_err)
            .await;
        if vanished && err.kind == ErrorKind::NotFound {
            return Ok(false);
        }
        Err(err)
    }
}
