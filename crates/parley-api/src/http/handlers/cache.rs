//! Response cache endpoints.

use std::time::Instant;

use axum::Json;
use axum::extract::State;

use parley_types::chat::CacheStats;

use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/cache
pub async fn get_cache_stats(State(state): State<AppState>) -> Json<ApiResponse<CacheStats>> {
    let start = Instant::now();
    Json(ApiResponse::success(state.orchestrator.cache().stats(), start))
}

/// DELETE /api/v1/cache - Drop all entries and reset counters.
pub async fn clear_cache(State(state): State<AppState>) -> Json<ApiResponse<CacheStats>> {
    let start = Instant::now();
    let cache = state.orchestrator.cache();
    cache.clear();
    Json(ApiResponse::success(cache.stats(), start))
}
