//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use cabinet_auth::{JwtDecoder, JwtEncoder, PasswordHasher, PasswordValidator};
use cabinet_core::config::AppConfig;
use cabinet_core::traits::BlobStore;
use cabinet_database::{CatalogStore, UserStore};
use cabinet_service::{
    AdminUserService, AuthService, Deadlines, ReconcileService, SyncOrchestrator,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Folder/file catalog
    pub catalog: Arc<dyn CatalogStore>,
    /// Blob store
    pub blobs: Arc<dyn BlobStore>,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Registration and login
    pub auth_service: Arc<AuthService>,
    /// Folder and file operations
    pub sync: Arc<SyncOrchestrator>,
    /// Admin user management
    pub admin_user_service: Arc<AdminUserService>,
    /// Cross-owner views and audit
    pub reconcile_service: Arc<ReconcileService>,
}

impl AppState {
    /// Wire services on top of already constructed stores.
    pub fn new(
        config: AppConfig,
        catalog: Arc<dyn CatalogStore>,
        users: Arc<dyn UserStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        let deadlines = Deadlines::from_config(&config.sync);

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&users),
            Arc::new(PasswordHasher::new()),
            Arc::new(PasswordValidator::new(&config.auth)),
            Arc::new(JwtEncoder::new(&config.auth)),
        ));
        let sync = Arc::new(SyncOrchestrator::new(
            Arc::clone(&catalog),
            Arc::clone(&blobs),
            &config.sync,
        ));
        let admin_user_service = Arc::new(AdminUserService::new(
            users,
            Arc::clone(&catalog),
            Arc::clone(&blobs),
            deadlines,
        ));
        let reconcile_service = Arc::new(ReconcileService::new(
            Arc::clone(&catalog),
            Arc::clone(&blobs),
            deadlines,
        ));

        Self {
            jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
            config: Arc::new(config),
            catalog,
            blobs,
            auth_service,
            sync,
            admin_user_service,
            reconcile_service,
        }
    }
}
