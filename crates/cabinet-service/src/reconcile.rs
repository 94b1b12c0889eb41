//! Blob store and catalog audit.
//!
//! A failed compensation leaves a `reconcile` log record behind. This
//! service finds the same drift by comparing both stores directly.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use cabinet_core::result::AppResult;
use cabinet_core::traits::BlobStore;
use cabinet_core::types::ObjectKey;
use cabinet_database::CatalogStore;
use cabinet_entity::file::File;
use cabinet_entity::folder::Folder;

use crate::deadline::Deadlines;

/// Kind of catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    /// A folder or subfolder.
    Folder,
    /// A file.
    File,
}

/// A catalog row whose blob is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingRow {
    /// Row kind.
    pub kind: RowKind,
    /// Owning username.
    pub owner: String,
    /// Folder or file name.
    pub name: String,
    /// Key the row points at.
    pub storage_key: String,
}

/// Result of an audit.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileReport {
    /// Number of blob keys inspected.
    pub blobs_checked: usize,
    /// Number of catalog rows inspected.
    pub rows_checked: usize,
    /// Blob keys no row points at.
    pub orphan_blobs: Vec<String>,
    /// Rows pointing at keys the blob store does not hold.
    pub dangling_rows: Vec<DanglingRow>,
}

impl ReconcileReport {
    /// Whether both stores agree.
    pub fn is_clean(&self) -> bool {
        self.orphan_blobs.is_empty() && self.dangling_rows.is_empty()
    }
}

/// Read-only views across every owner, plus the audit.
#[derive(Debug, Clone)]
pub struct ReconcileService {
    catalog: Arc<dyn CatalogStore>,
    blobs: Arc<dyn BlobStore>,
    deadlines: Deadlines,
}

impl ReconcileService {
    /// Creates a new reconcile service.
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        blobs: Arc<dyn BlobStore>,
        deadlines: Deadlines,
    ) -> Self {
        Self {
            catalog,
            blobs,
            deadlines,
        }
    }

    /// Every folder row.
    pub async fn all_folders(&self) -> AppResult<Vec<Folder>> {
        self.deadlines
            .catalog("folder list", self.catalog.list_folders())
            .await
    }

    /// Every file row.
    pub async fn all_files(&self) -> AppResult<Vec<File>> {
        self.deadlines
            .catalog("file list", self.catalog.list_files())
            .await
    }

    /// Every blob key in the store.
    pub async fn all_objects(&self) -> AppResult<Vec<String>> {
        self.deadlines.blob("blob list", self.blobs.list("")).await
    }

    /// Compare the blob store with the catalog, for one owner or for all.
    pub async fn audit(&self, owner: Option<&str>) -> AppResult<ReconcileReport> {
        let (keys, folders, files) = match owner {
            Some(owner) => {
                let prefix = ObjectKey::owner_prefix(owner);
                let keys = self
                    .deadlines
                    .blob("blob list", self.blobs.list(prefix.as_str()))
                    .await?;
                let folders = self
                    .deadlines
                    .catalog("folder list", self.catalog.list_folders_by_owner(owner))
                    .await?;
                let files = self
                    .deadlines
                    .catalog("file list", self.catalog.list_files_by_owner(owner))
                    .await?;
                (keys, folders, files)
            }
            None => (
                self.all_objects().await?,
                self.all_folders().await?,
                self.all_files().await?,
            ),
        };

        let report = compare(keys, &folders, &files);
        if report.is_clean() {
            info!(owner = ?owner, blobs = report.blobs_checked, rows = report.rows_checked, "Audit clean");
        } else {
            warn!(
                owner = ?owner,
                orphans = report.orphan_blobs.len(),
                dangling = report.dangling_rows.len(),
                "Audit found drift"
            );
        }
        Ok(report)
    }
}

fn compare(keys: Vec<String>, folders: &[Folder], files: &[File]) -> ReconcileReport {
    let stored: BTreeSet<String> = keys.into_iter().collect();

    let rows = folders
        .iter()
        .map(|f| (RowKind::Folder, &f.owner, &f.name, &f.storage_key))
        .chain(
            files
                .iter()
                .map(|f| (RowKind::File, &f.owner, &f.name, &f.storage_key)),
        );

    let mut referenced = BTreeSet::new();
    let mut dangling_rows = Vec::new();
    for (kind, owner, name, key) in rows {
        referenced.insert(key.as_str());
        if !stored.contains(key) {
            dangling_rows.push(DanglingRow {
                kind,
                owner: owner.clone(),
                name: name.clone(),
                storage_key: key.clone(),
            });
        }
    }

    let orphan_blobs = stored
        .iter()
        .filter(|k| !referenced.contains(k.as_str()))
        .cloned()
        .collect();

    ReconcileReport {
        blobs_checked: stored.len(),
        rows_checked: folders.len() + files.len(),
        orphan_blobs,
        dangling_rows,
    }
}
