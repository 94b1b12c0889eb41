//! CLI command definitions and dispatch.

pub mod catalog;
pub mod migrate;
pub mod reconcile;
pub mod user;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use cabinet_core::config::AppConfig;
use cabinet_core::error::AppError;
use cabinet_core::traits::BlobStore;
use cabinet_database::{CatalogStore, DatabasePool, PgCatalogStore, UserRepository, UserStore};
use cabinet_service::Deadlines;

use crate::output::OutputFormat;

/// Cabinet: web file manager administration
#[derive(Debug, Parser)]
#[command(name = "cabinet", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay (`config/{env}.toml`)
    #[arg(short, long, env = "CABINET_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// User management
    User(user::UserArgs),
    /// Catalog inspection
    Catalog(catalog::CatalogArgs),
    /// Compare the blob store with the catalog
    Reconcile(reconcile::ReconcileArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.config, &self.env)?;
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::User(args) => user::execute(args, &config, self.format).await,
            Commands::Catalog(args) => catalog::execute(args, &config, self.format).await,
            Commands::Reconcile(args) => reconcile::execute(args, &config, self.format).await,
        }
    }
}

/// Store handles the commands work against.
pub struct Stores {
    /// Pool behind the catalog and user store.
    pub db: DatabasePool,
    /// Folder/file catalog.
    pub catalog: Arc<dyn CatalogStore>,
    /// Registered users.
    pub users: Arc<dyn UserStore>,
    /// Configured blob store.
    pub blobs: Arc<dyn BlobStore>,
    /// Per-call deadlines.
    pub deadlines: Deadlines,
}

/// Helper: connect the PostgreSQL catalog and the configured blob store.
pub async fn connect(config: &AppConfig) -> Result<Stores, AppError> {
    let db = DatabasePool::connect(&config.database).await?;
    let catalog: Arc<dyn CatalogStore> = Arc::new(PgCatalogStore::new(db.clone()));
    let users: Arc<dyn UserStore> = Arc::new(UserRepository::new(db.pool().clone()));
    let blobs = cabinet_storage::build_blob_store(&config.storage).await?;
    Ok(Stores {
        db,
        catalog,
        users,
        blobs,
        deadlines: Deadlines::from_config(&config.sync),
    })
}

/// Ask before a destructive action unless `--yes` was given.
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool, AppError> {
    if assume_yes {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
