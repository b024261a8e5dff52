//! GET /api/v1/health - Database-backed health check.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::http::response::ApiResponse;
use crate::state::AppState;

/// 200 with the log size when the database answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> Response {
    let start = Instant::now();

    match state.orchestrator.log_count().await {
        Ok(total_entries) => {
            let data = serde_json::json!({
                "status": "healthy",
                "database": "connected",
                "total_entries": total_entries,
            });
            (StatusCode::OK, Json(ApiResponse::success(data, start))).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            let data = serde_json::json!({
                "status": "unhealthy",
                "database": "error",
                "error": e.to_string(),
            });
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::success(data, start)),
            )
                .into_response()
        }
    }
}
