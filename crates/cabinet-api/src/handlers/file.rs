//! File handlers: multipart upload, delete, rename, move.

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use bytes::Bytes;

use cabinet_core::error::AppError;
use cabinet_entity::file::File;
use cabinet_service::UploadRequest;

use crate::dto::request::{
    DeleteFileRequest, MoveFileRequest, RenameFileRequest, parse_path, validate_body,
};
use crate::dto::response::{ApiResponse, ChangedResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/files (multipart: `file`, optional `name`, `parent`, `sub`)
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ApiResponse<File>>)> {
    let mut content: Option<(String, Bytes)> = None;
    let mut name = None;
    let mut parent = None;
    let mut sub = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "file" => {
                let original = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Failed to read file: {e}")))?;
                content = Some((original, data));
            }
            "name" | "parent" | "sub" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Invalid {field_name}: {e}")))?;
                let value = Some(text.trim().to_string()).filter(|t| !t.is_empty());
                match field_name.as_str() {
                    "name" => name = value,
                    "parent" => parent = value,
                    _ => sub = value,
                }
            }
            _ => {}
        }
    }

    let (original_name, content) =
        content.ok_or_else(|| AppError::validation("No file was uploaded"))?;
    let limit = state.config.storage.max_upload_size_bytes;
    if u64::try_from(content.len()).unwrap_or(u64::MAX) > limit {
        return Err(AppError::validation(format!("File exceeds the {limit} byte upload limit")).into());
    }

    let file = state
        .sync
        .upload_file(
            &auth,
            UploadRequest {
                name,
                original_name,
                content,
                parent,
                sub,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(file))))
}

/// POST /api/files/delete
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<DeleteFileRequest>,
) -> ApiResult<Json<ApiResponse<ChangedResponse>>> {
    validate_body(&req)?;
    let parent = parse_path(req.parent.as_deref())?;
    let changed = state.sync.delete_file(&auth, &req.name, &parent).await?;
    Ok(Json(ApiResponse::ok(ChangedResponse { changed })))
}

/// POST /api/files/rename
pub async fn rename_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RenameFileRequest>,
) -> ApiResult<Json<ApiResponse<ChangedResponse>>> {
    validate_body(&req)?;
    let parent = parse_path(req.parent.as_deref())?;
    let changed = state
        .sync
        .rename_file(&auth, &req.old_name, &req.new_name, &parent)
        .await?;
    Ok(Json(ApiResponse::ok(ChangedResponse { changed })))
}

/// POST /api/files/move
pub async fn move_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<MoveFileRequest>,
) -> ApiResult<Json<ApiResponse<ChangedResponse>>> {
    validate_body(&req)?;
    let from = parse_path(req.from.as_deref())?;
    let to = parse_path(req.to.as_deref())?;
    let changed = state.sync.move_file(&auth, &req.name, &from, &to).await?;
    Ok(Json(ApiResponse::ok(ChangedResponse { changed })))
}
