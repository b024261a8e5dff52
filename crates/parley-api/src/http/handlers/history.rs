//! Chat history endpoints.
//!
//! GET /api/v1/history - Most recent log records first.
//! DELETE /api/v1/history - Remove every log record.

use std::time::Instant;

use axum::Json;
use axum::extract::{Query, State};
use serde::Serialize;

use parley_types::chat::ChatLogRecord;

use crate::http::error::AppError;
use crate::http::extractors::query::HistoryQuery;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ClearedHistory {
    pub deleted: u64,
}

pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<ChatLogRecord>>>, AppError> {
    let start = Instant::now();
    let limit = query.limit()?;

    let records = state.orchestrator.history(limit).await?;

    Ok(Json(
        ApiResponse::success(records, start)
            .with_link("self", "/api/v1/history")
            .with_link("stats", "/api/v1/stats"),
    ))
}

pub async fn clear_history(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ClearedHistory>>, AppError> {
    let start = Instant::now();

    let deleted = state.orchestrator.clear_log().await?;
    tracing::info!(deleted, "chat history cleared");

    Ok(Json(ApiResponse::success(ClearedHistory { deleted }, start)))
}
