//! Compensating blob store actions.

use std::sync::Arc;

use cabinet_core::error::{AppError, ErrorKind};
use cabinet_core::traits::BlobStore;

use crate::deadline::Deadlines;

/// How to undo a blob store step that the catalog did not follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
    /// Remove a blob that was written.
    DeleteBlob {
        /// The written key.
        key: String,
    },
    /// Put content back under its original key and drop the new key.
    RestoreBlob {
        /// Where the content used to live.
        original: String,
        /// Where it lives now.
        moved: String,
    },
    /// Put content back under its original key and keep the new key,
    /// which a concurrent writer's row now points at.
    CopyBack {
        /// Where the content used to live.
        original: String,
        /// Where it lives now.
        moved: String,
    },
    /// The step cannot be undone (the blob is gone).
    Impossible {
        /// The affected key.
        key: String,
    },
}

impl Compensation {
    /// Key the reconciliation record should point at.
    pub fn key(&self) -> &str {
        match self {
            Self::DeleteBlob { key } | Self::Impossible { key } => key,
            Self::RestoreBlob { moved, .. } => moved,
            Self::CopyBack { original, .. } => original,
        }
    }

    /// Run the action against the blob store.
    pub async fn run(&self, blobs: &Arc<dyn BlobStore>, deadlines: &Deadlines) -> Result<(), AppError> {
        match self {
            Self::DeleteBlob { key } => deadlines.blob("compensating delete", blobs.delete(key)).await,
            Self::RestoreBlob { original, moved } => {
                deadlines
                    .blob("compensating copy", blobs.copy(moved, original))
                    .await?;
                deadlines
                    .blob("compensating delete", blobs.delete(moved))
                    .await
            }
            Self::CopyBack { original, moved } => deadlines
                .blob("compensating copy", blobs.copy(moved, original))
                .await
                .map(drop),
            Self::Impossible { key } => Err(AppError::new(
                ErrorKind::PartialFailure,
                format!("No compensation available for {key}"),
            )),
        }
    }
}
