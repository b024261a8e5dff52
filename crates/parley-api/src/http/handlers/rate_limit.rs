//! GET /api/v1/rate-limit - Token bucket status.

use std::time::Instant;

use axum::Json;
use axum::extract::State;

use parley_types::chat::RateLimitStatus;

use crate::http::response::ApiResponse;
use crate::state::AppState;

pub async fn get_rate_limit(State(state): State<AppState>) -> Json<ApiResponse<RateLimitStatus>> {
    let start = Instant::now();
    Json(ApiResponse::success(state.orchestrator.limiter().status(), start))
}
