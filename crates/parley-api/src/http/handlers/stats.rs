//! GET /api/v1/stats - Chat log aggregate statistics.

use std::time::Instant;

use axum::Json;
use axum::extract::State;

use parley_types::chat::LogStats;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

pub async fn get_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<LogStats>>, AppError> {
    let start = Instant::now();

    let stats = state.orchestrator.log_stats().await?;

    Ok(Json(
        ApiResponse::success(stats, start)
            .with_link("self", "/api/v1/stats")
            .with_link("history", "/api/v1/history"),
    ))
}
