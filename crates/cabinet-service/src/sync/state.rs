//! Per-operation state tracking.

use std::fmt;

use tracing::{debug, info, warn};

use cabinet_core::error::{AppError, ErrorKind};
use cabinet_core::result::AppResult;

/// Orchestrated operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOp {
    /// Create a folder or subfolder.
    CreateFolder,
    /// Upload a file.
    UploadFile,
    /// Delete a file.
    DeleteFile,
    /// Rename a file in place.
    RenameFile,
    /// Move a file between folders.
    MoveFile,
    /// Delete a folder with everything in it.
    DeleteFolder,
}

impl fmt::Display for SyncOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CreateFolder => "create_folder",
            Self::UploadFile => "upload_file",
            Self::DeleteFile => "delete_file",
            Self::RenameFile => "rename_file",
            Self::MoveFile => "move_file",
            Self::DeleteFolder => "delete_folder",
        };
        f.write_str(name)
    }
}

/// Where an operation currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    /// Running existence checks.
    Validating,
    /// Mutating the blob store.
    RemoteMutating,
    /// Mutating the catalog.
    LocalMutating,
    /// Undoing the blob store step after a catalog failure.
    Compensating,
    /// Finished successfully.
    Done,
    /// Stopped with an error of this kind.
    Failed(ErrorKind),
}

/// Logs stage transitions of one operation.
#[derive(Debug)]
pub struct SyncTrace {
    op: SyncOp,
    owner: String,
    stage: SyncStage,
}

impl SyncTrace {
    /// Start tracking `op` in the `Validating` stage.
    pub fn begin(op: SyncOp, owner: &str) -> Self {
        debug!(%op, owner, "Validating");
        Self {
            op,
            owner: owner.to_string(),
            stage: SyncStage::Validating,
        }
    }

    /// The operation being tracked.
    pub fn op(&self) -> SyncOp {
        self.op
    }

    /// The current stage.
    pub fn stage(&self) -> SyncStage {
        self.stage
    }

    /// Move to the next stage.
    pub fn advance(&mut self, next: SyncStage) {
        debug!(op = %self.op, owner = %self.owner, from = ?self.stage, to = ?next, "Stage change");
        self.stage = next;
    }

    /// Record the outcome and hand it back.
    pub fn settle<T>(mut self, result: AppResult<T>) -> AppResult<T> {
        match &result {
            Ok(_) => {
                self.stage = SyncStage::Done;
                info!(op = %self.op, owner = %self.owner, "Operation completed");
            }
            Err(err) => {
                let failed_in = self.stage;
                self.stage = SyncStage::Failed(err.kind);
                log_failure(self.op, &self.owner, failed_in, err);
            }
        }
        result
    }
}

fn log_failure(op: SyncOp, owner: &str, failed_in: SyncStage, err: &AppError) {
    if err.is_business() {
        debug!(%op, owner, stage = ?failed_in, error = %err, "Operation rejected");
    } else {
        warn!(%op, owner, stage = ?failed_in, error = %err, "Operation failed");
    }
}
