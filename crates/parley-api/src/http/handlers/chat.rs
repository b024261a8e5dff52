//! POST /api/v1/chat - One chat exchange through the orchestrator.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequestBody {
    pub message: String,
    /// Model override for this request only.
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponseBody {
    pub response: String,
    pub tokens_used: u32,
    pub was_cached: bool,
    pub model_name: String,
}

/// Rate-limited requests get 429 with `Retry-After`, upstream failures 502,
/// and an empty message 400.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequestBody>,
) -> Result<Json<ApiResponse<ChatResponseBody>>, AppError> {
    let start = Instant::now();

    let reply = state
        .orchestrator
        .chat_with_model(&body.message, body.model.as_deref())
        .await?;

    let data = ChatResponseBody {
        response: reply.response,
        tokens_used: reply.tokens_used,
        was_cached: reply.was_cached,
        model_name: reply.model,
    };

    Ok(Json(
        ApiResponse::success(data, start).with_link("history", "/api/v1/history"),
    ))
}
