//! Cross-owner catalog and blob store views, plus the reconcile audit.

use axum::Json;
use axum::extract::{Query, State};

use cabinet_entity::file::File;
use cabinet_entity::folder::Folder;
use cabinet_service::ReconcileReport;

use crate::dto::request::ReconcileQuery;
use crate::dto::response::{ApiResponse, ObjectsResponse};
use crate::error::ApiResult;
use crate::extractors::AdminUser;
use crate::state::AppState;

/// GET /api/admin/folders
pub async fn list_folders(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<ApiResponse<Vec<Folder>>>> {
    let folders = state.reconcile_service.all_folders().await?;
    Ok(Json(ApiResponse::ok(folders)))
}

/// GET /api/admin/files
pub async fn list_files(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<ApiResponse<Vec<File>>>> {
    let files = state.reconcile_service.all_files().await?;
    Ok(Json(ApiResponse::ok(files)))
}

/// GET /api/admin/objects
pub async fn list_objects(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<ApiResponse<ObjectsResponse>>> {
    let keys = state.reconcile_service.all_objects().await?;
    Ok(Json(ApiResponse::ok(ObjectsResponse { keys })))
}

/// GET /api/admin/reconcile?owner=
pub async fn reconcile(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ReconcileQuery>,
) -> ApiResult<Json<ApiResponse<ReconcileReport>>> {
    let report = state
        .reconcile_service
        .audit(query.owner.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(report)))
}
