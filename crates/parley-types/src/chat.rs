//! Chat exchange, log record, and status snapshot types for Parley.
//!
//! These types model one completed exchange (prompt + reply), its persisted
//! log record, and the read-only snapshots the transport adapters display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Re-export MessageRole from llm module (turns in the context carry it too).
pub use crate::llm::{Message, MessageRole};

/// Result of one `chat` call as seen by a transport adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub tokens_used: u32,
    pub was_cached: bool,
    pub model: String,
    /// Row id of the log record, `None` when logging failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_id: Option<i64>,
}

/// A persisted chat exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatLogRecord {
    pub id: i64,
    pub prompt: String,
    pub response: String,
    pub tokens_used: u32,
    pub created_at: DateTime<Utc>,
    pub model: String,
    pub was_cached: bool,
}

/// A chat exchange about to be persisted (id assigned by the store).
#[derive(Debug, Clone)]
pub struct NewChatLogRecord {
    pub prompt: String,
    pub response: String,
    pub tokens_used: u32,
    pub created_at: DateTime<Utc>,
    pub model: String,
    pub was_cached: bool,
}

/// Aggregate statistics over the chat log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogStats {
    pub total_entries: i64,
    pub total_tokens_used: i64,
    pub cached_entries: i64,
    /// Percentage of logged exchanges served from cache, one decimal place.
    pub cache_hit_rate: f64,
    pub latest_timestamp: Option<DateTime<Utc>>,
}

/// Snapshot of the response cache counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub hits: u64,
    pub misses: u64,
    /// `hits / (hits + misses) * 100`, two decimal places.
    pub hit_rate: f64,
    pub ttl_seconds: u64,
}

/// Snapshot of the rate limiter's bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitStatus {
    pub requests_per_minute: u32,
    pub available_tokens: u32,
    pub capacity: u32,
    pub refill_rate_per_second: f64,
    pub time_until_next_token: f64,
}
