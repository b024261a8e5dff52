//! GET / - Service information.

use std::time::Instant;

use axum::Json;
use axum::extract::State;

use crate::http::response::ApiResponse;
use crate::state::AppState;

const ENDPOINTS: &[&str] = &[
    "POST /api/v1/chat - Send a chat message",
    "GET /api/v1/history - Recent chat history",
    "DELETE /api/v1/history - Clear chat history",
    "GET /api/v1/stats - Chat log statistics",
    "GET /api/v1/health - Service health",
    "GET /api/v1/cache - Response cache statistics",
    "DELETE /api/v1/cache - Clear the response cache",
    "GET /api/v1/rate-limit - Rate limiter status",
    "GET /api/v1/memory - Remembered conversation",
    "DELETE /api/v1/memory - Forget the conversation",
];

pub async fn root(State(state): State<AppState>) -> Json<ApiResponse<serde_json::Value>> {
    let start = Instant::now();

    let data = serde_json::json!({
        "name": "Parley",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.orchestrator.model(),
        "endpoints": ENDPOINTS,
    });

    Json(ApiResponse::success(data, start).with_link("self", "/"))
}
