//! Application builder: wires stores, services, and the router, then serves.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tracing::{info, warn};

use cabinet_core::config::{AppConfig, CatalogBackend};
use cabinet_core::error::AppError;
use cabinet_core::traits::BlobStore;
use cabinet_database::{
    CatalogStore, DatabasePool, MemoryCatalog, MemoryUserStore, PgCatalogStore, UserRepository,
    UserStore,
};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Connects the configured stores, then serves until Ctrl+C.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!("Starting Cabinet server...");

    // ── Step 1: Catalog and user stores ──────────────────────────
    let (catalog, users, db) = match config.database.backend {
        CatalogBackend::Postgres => {
            let db = DatabasePool::connect(&config.database).await?;
            cabinet_database::migration::run_migrations(db.pool()).await?;
            let catalog: Arc<dyn CatalogStore> = Arc::new(PgCatalogStore::new(db.clone()));
            let users: Arc<dyn UserStore> = Arc::new(UserRepository::new(db.pool().clone()));
            (catalog, users, Some(db))
        }
        CatalogBackend::Memory => {
            warn!("Using the in-memory catalog, data is lost on shutdown");
            let catalog: Arc<dyn CatalogStore> = Arc::new(MemoryCatalog::new());
            let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
            (catalog, users, None)
        }
    };

    // ── Step 2: Blob store ───────────────────────────────────────
    let blobs: Arc<dyn BlobStore> = cabinet_storage::build_blob_store(&config.storage).await?;
    match blobs.health_check().await {
        Ok(true) => info!(provider = blobs.provider_type(), "Blob store reachable"),
        Ok(false) | Err(_) => {
            warn!(provider = blobs.provider_type(), "Blob store health check failed")
        }
    }

    // ── Step 3: Serve ────────────────────────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let app = build_app(AppState::new(config, catalog, users, blobs));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    info!("Cabinet server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(db) = db {
        if tokio::time::timeout(grace, db.close()).await.is_err() {
            warn!("Database pool did not close within the grace period");
        }
    }
    info!("Cabinet server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C, shutting down");
    }
    info!("Shutdown signal received");
}
