use std::time::Duration;

use thiserror::Error;

use crate::llm::LlmError;

/// Errors surfaced by a chat exchange and the operations around it.
///
/// Transport adapters match on the variant to pick a status code or message:
/// `RateLimited` is retryable and carries its retry-after, `Upstream` wraps
/// whatever the provider reported.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{message}")]
    RateLimited {
        message: String,
        retry_after: Duration,
    },

    #[error("chat failed: {0}")]
    Upstream(#[from] LlmError),

    #[error("missing configuration: {0}")]
    ConfigurationMissing(String),

    #[error("log store failure: {0}")]
    Persistence(#[from] RepositoryError),

    #[error("prompt must not be empty")]
    EmptyPrompt,
}

impl ChatError {
    /// Seconds until a retry may succeed, for rate-limit errors.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            ChatError::RateLimited { retry_after, .. } => {
                Some(retry_after.as_secs_f64().ceil() as u64)
            }
            _ => None,
        }
    }
}

/// Errors from repository operations (used by trait definitions in parley-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),
}
