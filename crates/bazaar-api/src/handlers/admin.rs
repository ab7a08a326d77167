use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use bazaar_core::models::ApiResponse;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReconcileResponse {
    pub scanned: usize,
    pub removed: Vec<String>,
    pub failed: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/api/v0/admin/reconcile",
    tag = "admin",
    responses(
        (status = 200, description = "Sweep finished; orphaned folders removed", body = ReconcileResponse),
        (status = 500, description = "Media store listing failed", body = ErrorResponse)
    )
)]
pub async fn run_reconcile(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let report = state.reconcile.sweep().await?;
    Ok(Json(ApiResponse::data(ReconcileResponse {
        scanned: report.scanned,
        removed: report.removed,
        failed: report.failed,
    })))
}
