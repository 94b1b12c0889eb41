//! Embedded migration runner.

use sqlx::PgPool;
use tracing::info;

use cabinet_core::error::{AppError, ErrorKind};

/// Apply every pending migration from the workspace `migrations/` folder.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Running catalog migrations");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Catalog migrations applied");
    Ok(())
}
