//! Folder handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use cabinet_entity::folder::Folder;

use crate::dto::request::{CreateFolderRequest, DeleteFolderRequest, parse_path, validate_body};
use crate::dto::response::{ApiResponse, FolderDeletedResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateFolderRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Folder>>)> {
    validate_body(&req)?;
    let parent = parse_path(req.parent.as_deref())?;
    let folder = state.sync.create_folder(&auth, &req.name, &parent).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(folder))))
}

/// DELETE /api/folders
pub async fn delete_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<DeleteFolderRequest>,
) -> ApiResult<Json<ApiResponse<FolderDeletedResponse>>> {
    validate_body(&req)?;
    let path = parse_path(Some(req.path.as_str()))?;
    let blobs_removed = state.sync.delete_folder(&auth, &path).await?;
    Ok(Json(ApiResponse::ok(FolderDeletedResponse {
        path: path.to_string(),
        blobs_removed,
    })))
}
