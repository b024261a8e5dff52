//! Query parameter extractors for list endpoints.

use serde::Deserialize;

use crate::http::error::AppError;

const DEFAULT_HISTORY_LIMIT: i64 = 20;
const MAX_HISTORY_LIMIT: i64 = 100;

/// Query parameters for the history endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct HistoryQuery {
    /// Maximum results (1..=100, default 20).
    pub limit: Option<i64>,
}

impl HistoryQuery {
    /// The requested limit, validated.
    pub fn limit(&self) -> Result<u32, AppError> {
        let limit = self.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        if !(1..=MAX_HISTORY_LIMIT).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_HISTORY_LIMIT}, got {limit}"
            )));
        }
        Ok(limit as u32)
    }
}
