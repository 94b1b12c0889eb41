//! Catalog inspection commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use cabinet_core::config::AppConfig;
use cabinet_core::error::AppError;
use cabinet_database::CatalogStore;
use cabinet_entity::file::File;
use cabinet_entity::folder::Folder;
use cabinet_service::ReconcileService;

use crate::output::{self, OutputFormat};

/// Arguments for catalog commands
#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Catalog subcommand
    #[command(subcommand)]
    pub command: CatalogCommand,
}

/// Catalog subcommands
#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// List folder rows
    Folders {
        /// Only this owner's folders
        #[arg(short, long)]
        owner: Option<String>,
    },
    /// List file rows
    Files {
        /// Only this owner's files
        #[arg(short, long)]
        owner: Option<String>,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    owner: String,
    name: String,
    parent: String,
    storage_key: String,
    created_at: String,
}

#[derive(Debug, Serialize, Tabled)]
struct FileRow {
    owner: String,
    name: String,
    size: i64,
    storage_key: String,
    integrity_tag: String,
    created_at: String,
}

impl From<&Folder> for FolderRow {
    fn from(f: &Folder) -> Self {
        Self {
            owner: f.owner.clone(),
            name: f.name.clone(),
            parent: f.parent_folder.map(|p| p.to_string()).unwrap_or_else(|| "-".into()),
            storage_key: f.storage_key.clone(),
            created_at: f.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

impl From<&File> for FileRow {
    fn from(f: &File) -> Self {
        Self {
            owner: f.owner.clone(),
            name: f.name.clone(),
            size: f.size,
            storage_key: f.storage_key.clone(),
            integrity_tag: f.integrity_tag.clone(),
            created_at: f.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute catalog commands
pub async fn execute(
    args: &CatalogArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let stores = super::connect(config).await?;

    match &args.command {
        CatalogCommand::Folders { owner } => {
            let folders = match owner {
                Some(owner) => stores.catalog.list_folders_by_owner(owner).await?,
                None => {
                    ReconcileService::new(stores.catalog.clone(), stores.blobs.clone(), stores.deadlines)
                        .all_folders()
                        .await?
                }
            };
            let rows: Vec<FolderRow> = folders.iter().map(FolderRow::from).collect();
            output::print_list(&rows, format);
        }
        CatalogCommand::Files { owner } => {
            let files = match owner {
                Some(owner) => stores.catalog.list_files_by_owner(owner).await?,
                None => {
                    ReconcileService::new(stores.catalog.clone(), stores.blobs.clone(), stores.deadlines)
                        .all_files()
                        .await?
                }
            };
            let rows: Vec<FileRow> = files.iter().map(FileRow::from).collect();
            output::print_list(&rows, format);
        }
    }

    stores.db.close().await;
    Ok(())
}
