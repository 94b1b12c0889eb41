//! Admin user management handlers.

use axum::Json;
use axum::extract::{Path, State};

use cabinet_service::DeletedUser;

use crate::dto::response::{ApiResponse, UserResponse};
use crate::error::ApiResult;
use crate::extractors::AdminUser;
use crate::state::AppState;

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let users = state.admin_user_service.list_users().await?;
    Ok(Json(ApiResponse::ok(
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

/// DELETE /api/admin/users/{username}
pub async fn delete_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(username): Path<String>,
) -> ApiResult<Json<ApiResponse<DeletedUser>>> {
    tracing::info!(admin = %admin.username, target_user = %username, "Admin deleting user");
    let deleted = state.admin_user_service.delete_user(&username).await?;
    Ok(Json(ApiResponse::ok(deleted)))
}
