//! ChatLogRepository trait definition.
//!
//! Append-and-query persistence for completed exchanges. Follows the
//! RPITIT pattern used by every port in this crate.

use parley_types::chat::{ChatLogRecord, LogStats, NewChatLogRecord};
use parley_types::error::RepositoryError;

/// Repository trait for the chat log.
///
/// Implementations live in parley-infra (e.g., `SqliteChatLogRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ChatLogRepository: Send + Sync {
    /// Persist one exchange and return its assigned id.
    fn append(
        &self,
        record: &NewChatLogRecord,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;

    /// Most recent records first, at most `limit` of them.
    fn recent(
        &self,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ChatLogRecord>, RepositoryError>> + Send;

    /// Aggregate statistics over the whole log.
    fn stats(&self) -> impl std::future::Future<Output = Result<LogStats, RepositoryError>> + Send;

    /// Total number of records. Doubles as the liveness probe query.
    fn count(&self) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;

    /// Delete every record, returning how many were removed.
    fn delete_all(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
