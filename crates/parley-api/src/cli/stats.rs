//! `parley stats` - chat log statistics.

use anyhow::Result;

use parley_core::chat::ChatLogRepository;

use super::display::print_log_stats;

pub async fn show_stats<R: ChatLogRepository>(log: &R, json: bool) -> Result<()> {
    let stats = log.stats().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    print_log_stats(&stats);
    Ok(())
}
