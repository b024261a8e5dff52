//! SQLite chat log repository implementation.
//!
//! Implements `ChatLogRepository` from `parley-core` using sqlx with split
//! read/write pools: raw queries, a private Row struct, appends and deletes
//! on the writer, everything else on the reader.

use chrono::{DateTime, SecondsFormat, Utc};
use parley_core::chat::repository::ChatLogRepository;
use parley_types::chat::{ChatLogRecord, LogStats, NewChatLogRecord};
use parley_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatLogRepository`.
#[derive(Clone)]
pub struct SqliteChatLogRepository {
    pool: DatabasePool,
}

impl SqliteChatLogRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ChatLogRow {
    id: i64,
    prompt: String,
    response: String,
    tokens_used: i64,
    created_at: String,
    model: String,
    was_cached: bool,
}

impl ChatLogRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            prompt: row.try_get("prompt")?,
            response: row.try_get("response")?,
            tokens_used: row.try_get("tokens_used")?,
            created_at: row.try_get("created_at")?,
            model: row.try_get("model")?,
            was_cached: row.try_get("was_cached")?,
        })
    }

    fn into_record(self) -> Result<ChatLogRecord, RepositoryError> {
        Ok(ChatLogRecord {
            id: self.id,
            prompt: self.prompt,
            response: self.response,
            tokens_used: self.tokens_used.max(0) as u32,
            created_at: parse_datetime(&self.created_at)?,
            model: self.model,
            was_cached: self.was_cached,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width UTC timestamps so `ORDER BY created_at` sorts chronologically.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// ChatLogRepository implementation
// ---------------------------------------------------------------------------

impl ChatLogRepository for SqliteChatLogRepository {
    async fn append(&self, record: &NewChatLogRecord) -> Result<i64, RepositoryError> {
        let result = sqlx::query(
            r#"INSERT INTO chat_history (prompt, response, tokens_used, created_at, model, was_cached)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&record.prompt)
        .bind(&record.response)
        .bind(i64::from(record.tokens_used))
        .bind(format_datetime(&record.created_at))
        .bind(&record.model)
        .bind(record.was_cached)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.last_insert_rowid())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<ChatLogRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM chat_history ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let log_row =
                ChatLogRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            records.push(log_row.into_record()?);
        }

        Ok(records)
    }

    async fn stats(&self) -> Result<LogStats, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT COUNT(*) AS total_entries,
                      COALESCE(SUM(tokens_used), 0) AS total_tokens_used,
                      COALESCE(SUM(was_cached), 0) AS cached_entries,
                      MAX(created_at) AS latest_timestamp
               FROM chat_history"#,
        )
        .fetch_one(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let total_entries: i64 = row
            .try_get("total_entries")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let total_tokens_used: i64 = row
            .try_get("total_tokens_used")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let cached_entries: i64 = row
            .try_get("cached_entries")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let latest: Option<String> = row
            .try_get("latest_timestamp")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let cache_hit_rate = if total_entries > 0 {
            round_one_decimal(cached_entries as f64 / total_entries as f64 * 100.0)
        } else {
            0.0
        };

        Ok(LogStats {
            total_entries,
            total_tokens_used,
            cached_entries,
            cache_hit_rate,
            latest_timestamp: latest.as_deref().map(parse_datetime).transpose()?,
        })
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM chat_history")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))
    }

    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM chat_history")
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
