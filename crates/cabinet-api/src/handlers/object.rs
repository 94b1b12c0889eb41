//! Blob store listing for the caller.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, ObjectsResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/objects
pub async fn list_objects(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<ObjectsResponse>>> {
    let keys = state.sync.list_objects(&auth).await?;
    Ok(Json(ApiResponse::ok(ObjectsResponse { keys })))
}
