//! Dashboard summary and health check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use khata_core::DashboardStats;
use serde_json::{json, Value};
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::SharedState;

/// `GET /api/dashboard/stats`, computed for the server's local day.
pub async fn stats(State(state): State<SharedState>) -> ApiResult<Json<DashboardStats>> {
    let stats = state
        .db
        .dashboard()
        .stats()
        .await
        .map_err(ApiError::store("dashboard", "fetch dashboard stats"))?;
    Ok(Json(stats))
}

/// `GET /api/health`: 200 when the database answers, 503 otherwise.
pub async fn health(State(state): State<SharedState>) -> (StatusCode, Json<Value>) {
    if state.db.health_check().await {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        warn!("Health check failed: database unreachable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable" })),
        )
    }
}
