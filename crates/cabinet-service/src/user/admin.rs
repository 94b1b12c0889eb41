//! Admin user management.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use cabinet_core::error::AppError;
use cabinet_core::result::AppResult;
use cabinet_core::traits::BlobStore;
use cabinet_core::types::ObjectKey;
use cabinet_database::{CatalogStore, UserStore};
use cabinet_entity::user::User;

use crate::deadline::Deadlines;

/// What deleting a user removed.
#[derive(Debug, Clone, Serialize)]
pub struct DeletedUser {
    /// The removed user.
    pub user: User,
    /// Blobs removed under the user's prefix.
    pub blobs_removed: usize,
    /// Folder and file rows removed.
    pub rows_removed: u64,
}

/// Lists and deletes users together with everything they own.
#[derive(Debug, Clone)]
pub struct AdminUserService {
    users: Arc<dyn UserStore>,
    catalog: Arc<dyn CatalogStore>,
    blobs: Arc<dyn BlobStore>,
    deadlines: Deadlines,
}

impl AdminUserService {
    /// Creates a new admin user service.
    pub fn new(
        users: Arc<dyn UserStore>,
        catalog: Arc<dyn CatalogStore>,
        blobs: Arc<dyn BlobStore>,
        deadlines: Deadlines,
    ) -> Self {
        Self {
            users,
            catalog,
            blobs,
            deadlines,
        }
    }

    /// Every registered user.
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.deadlines
            .catalog("user list", self.users.list())
            .await
    }

    /// Delete a user with their blobs and catalog rows.
    ///
    /// Blobs go first, then rows, then the user, so a failure part way
    /// leaves catalog rows that the audit reports as dangling rather than
    /// unreachable blobs.
    pub async fn delete_user(&self, username: &str) -> AppResult<DeletedUser> {
        let existing = self
            .deadlines
            .catalog("user lookup", self.users.find_by_username(username))
            .await?;
        if existing.is_none() {
            return Err(AppError::not_found(format!("User ({username}) does not exist")));
        }

        let prefix = ObjectKey::owner_prefix(username);
        let keys = self
            .deadlines
            .blob("blob list", self.blobs.list(prefix.as_str()))
            .await?;
        for key in keys.iter().rev() {
            self.deadlines
                .blob("blob delete", self.blobs.delete(key))
                .await?;
        }

        let rows_removed = self
            .deadlines
            .catalog("owner delete", self.catalog.delete_owner(username))
            .await?;
        let user = self
            .deadlines
            .catalog("user delete", self.users.delete_by_username(username))
            .await?
            .ok_or_else(|| AppError::not_found(format!("User ({username}) does not exist")))?;

        info!(
            username,
            blobs_removed = keys.len(),
            rows_removed,
            "User deleted"
        );
        Ok(DeletedUser {
            user,
            blobs_removed: keys.len(),
            rows_removed,
        })
    }
}
