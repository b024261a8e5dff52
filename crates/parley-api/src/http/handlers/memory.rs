//! Conversation memory endpoints.
//!
//! GET /api/v1/memory - The remembered turns, oldest first.
//! DELETE /api/v1/memory - Forget them.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use parley_types::chat::Message;

use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MemorySnapshot {
    pub turns: usize,
    pub max_turns: usize,
    pub messages: Vec<Message>,
}

pub async fn get_memory(State(state): State<AppState>) -> Json<ApiResponse<MemorySnapshot>> {
    let start = Instant::now();
    let context = state.orchestrator.context();
    let messages = context.snapshot();

    let data = MemorySnapshot {
        turns: messages.len(),
        max_turns: context.max_turns(),
        messages,
    };
    Json(ApiResponse::success(data, start))
}

pub async fn clear_memory(State(state): State<AppState>) -> Json<ApiResponse<MemorySnapshot>> {
    let start = Instant::now();
    let context = state.orchestrator.context();
    context.clear();

    let data = MemorySnapshot {
        turns: 0,
        max_turns: context.max_turns(),
        messages: Vec::new(),
    };
    Json(ApiResponse::success(data, start))
}
