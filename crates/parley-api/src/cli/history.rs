//! `parley history` and `parley clear-history`.

use anyhow::Result;
use console::style;
use dialoguer::Confirm;

use parley_core::chat::ChatLogRepository;

use super::display::print_log_records;

const PREVIEW_CHARS: usize = 50;

/// Print the most recent `limit` log records.
pub async fn show_history<R: ChatLogRepository>(log: &R, limit: u32, json: bool) -> Result<()> {
    let records = log.recent(limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    print_log_records(&records, PREVIEW_CHARS);
    Ok(())
}

/// Delete every log record, asking first unless `yes` (or `json`) is set.
pub async fn clear_history<R: ChatLogRepository>(log: &R, yes: bool, json: bool) -> Result<u64> {
    if !yes && !json {
        let count = log.count().await?;
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Permanently delete {} chat log entries?",
                style(count).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(0);
        }
    }

    let deleted = log.delete_all().await?;

    if json {
        println!("{}", serde_json::json!({ "deleted": deleted }));
    } else {
        println!(
            "  {} Cleared {} chat log entries.",
            style("✓").red().bold(),
            deleted
        );
    }

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use parley_infra::sqlite::chat_log::SqliteChatLogRepository;
    use parley_infra::sqlite::pool::{DatabasePool, database_url};
    use parley_types::chat::NewChatLogRecord;

    async fn seeded_log(dir: &tempfile::TempDir, entries: usize) -> SqliteChatLogRepository {
        let pool = DatabasePool::new(&database_url(&dir.path().join("cli.db")))
            .await
            .unwrap();
        let log = SqliteChatLogRepository::new(pool);
        for i in 0..entries {
            log.append(&NewChatLogRecord {
                prompt: format!("prompt {i}"),
                response: "x".repeat(80),
                tokens_used: 22,
                created_at: Utc::now(),
                model: "gemini-2.5-flash".to_string(),
                was_cached: i % 2 == 1,
            })
            .await
            .unwrap();
        }
        log
    }

    #[tokio::test]
    async fn test_show_history_renders_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let log = seeded_log(&dir, 3).await;

        show_history(&log, 10, true).await.unwrap();
        show_history(&log, 10, false).await.unwrap();
    }

    #[tokio::test]
    async fn test_clear_history_with_yes_skips_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let log = seeded_log(&dir, 4).await;

        assert_eq!(clear_history(&log, true, false).await.unwrap(), 4);
        assert_eq!(log.count().await.unwrap(), 0);
    }
}
