//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

fn describe(result: Result<bool, cabinet_core::error::AppError>) -> (bool, String) {
    match result {
        Ok(true) => (true, "available".to_string()),
        Ok(false) => (false, "unavailable".to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (false, "unavailable".to_string())
        }
    }
}

/// GET /api/health
pub async fn health(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let (catalog_ok, catalog) = describe(state.catalog.health_check().await);
    let (blobs_ok, blob_store) = describe(state.blobs.health_check().await);
    let healthy = catalog_ok && blobs_ok;

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(ApiResponse::ok(HealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            catalog,
            blob_store,
        })),
    )
}
