//! The sync orchestrator: shared state and helpers.

use std::sync::Arc;

use tracing::{error, info, warn};

use cabinet_core::config::SyncConfig;
use cabinet_core::error::{AppError, ErrorKind};
use cabinet_core::result::AppResult;
use cabinet_core::traits::BlobStore;
use cabinet_core::types::ObjectKey;
use cabinet_database::CatalogStore;
use cabinet_entity::file::File;

use crate::context::RequestContext;
use crate::deadline::Deadlines;
use crate::path::ExistenceGuard;
use crate::sync::compensation::Compensation;
use crate::sync::state::SyncOp;

/// Keeps the catalog in step with the blob store.
///
/// Operations live in [`crate::sync::folder`] and [`crate::sync::file`].
#[derive(Debug, Clone)]
pub struct SyncOrchestrator {
    pub(crate) catalog: Arc<dyn CatalogStore>,
    pub(crate) blobs: Arc<dyn BlobStore>,
    pub(crate) guard: ExistenceGuard,
    pub(crate) deadlines: Deadlines,
    compensation_enabled: bool,
}

impl SyncOrchestrator {
    /// Creates a new orchestrator.
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        blobs: Arc<dyn BlobStore>,
        config: &SyncConfig,
    ) -> Self {
        let deadlines = Deadlines::from_config(config);
        Self {
            guard: ExistenceGuard::new(Arc::clone(&catalog), deadlines),
            catalog,
            blobs,
            deadlines,
            compensation_enabled: config.compensate,
        }
    }

    /// The existence guard, for read-only checks.
    pub fn guard(&self) -> &ExistenceGuard {
        &self.guard
    }

    /// Every blob key the caller owns.
    pub async fn list_objects(&self, ctx: &RequestContext) -> AppResult<Vec<String>> {
        let prefix = ObjectKey::owner_prefix(ctx.owner());
        self.deadlines
            .blob("blob list", self.blobs.list(prefix.as_str()))
            .await
    }

    /// Undo the remote step after the local step failed with `local_err`.
    ///
    /// Hands `local_err` back when the undo worked. Otherwise logs a
    /// reconciliation record on the `reconcile` target and returns
    /// `PartialFailure`.
    pub(crate) async fn compensate(
        &self,
        op: SyncOp,
        owner: &str,
        action: Compensation,
        local_err: AppError,
    ) -> AppError {
        let outcome = if self.compensation_enabled {
            action.run(&self.blobs, &self.deadlines).await
        } else {
            Err(AppError::new(
                ErrorKind::PartialFailure,
                "Compensation is disabled",
            ))
        };

        match outcome {
            Ok(()) => {
                info!(%op, owner, key = action.key(), "Compensated blob store step");
                local_err
            }
            Err(comp_err) => {
                record_out_of_sync(op, owner, action.key(), &local_err, &comp_err);
                AppError::partial_failure(format!(
                    "{op} left the blob store and catalog out of sync: {}",
                    local_err.message
                ))
            }
        }
    }

    /// Copy a file's blob to `dst`, then delete the original.
    ///
    /// Returns the tag of the blob now holding the content. When `dst` is
    /// already the file's key nothing moves. If the delete fails the new
    /// copy is removed again so the catalog row stays accurate.
    pub(crate) async fn copy_then_delete(
        &self,
        op: SyncOp,
        file: &File,
        dst: &str,
    ) -> AppResult<String> {
        let src = file.storage_key.as_str();
        if src == dst {
            return Ok(file.integrity_tag.clone());
        }

        let tag = self
            .deadlines
            .blob("blob copy", self.blobs.copy(src, dst))
            .await?;

        if let Err(delete_err) = self
            .deadlines
            .blob("blob delete", self.blobs.delete(src))
            .await
        {
            warn!(%op, src, dst, error = %delete_err, "Delete after copy failed, removing copy");
            if let Err(cleanup_err) = self
                .deadlines
                .blob("blob delete", self.blobs.delete(dst))
                .await
            {
                record_out_of_sync(op, &file.owner, dst, &delete_err, &cleanup_err);
                return Err(AppError::partial_failure(format!(
                    "{op} left a second copy at {dst}: {}",
                    delete_err.message
                )));
            }
            return Err(delete_err);
        }
        Ok(tag)
    }
}

/// Log a reconciliation candidate.
pub(crate) fn record_out_of_sync(
    op: SyncOp,
    owner: &str,
    key: &str,
    cause: &AppError,
    followup: &AppError,
) {
    error!(
        target: "reconcile",
        %op,
        owner,
        key,
        cause = %cause,
        followup = %followup,
        "Blob store and catalog are out of sync"
    );
}
