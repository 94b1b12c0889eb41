//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cabinet_entity::user::User;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// User summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Email.
    pub email: String,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.into_uuid(),
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Access token.
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Access token expiration.
    pub expires_at: DateTime<Utc>,
    /// User info.
    pub user: UserResponse,
}

/// Outcome of a delete, rename or move that may match nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangedResponse {
    /// Whether a catalog row changed.
    pub changed: bool,
}

/// Outcome of a folder delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderDeletedResponse {
    /// Deleted path.
    pub path: String,
    /// Blobs removed.
    pub blobs_removed: usize,
}

/// Blob keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectsResponse {
    /// Keys in lexical order.
    pub keys: Vec<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Catalog state.
    pub catalog: String,
    /// Blob store state.
    pub blob_store: String,
}
