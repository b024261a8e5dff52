//! Styled terminal rendering shared by the chat loop and one-shot commands.

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use parley_core::chat::tokens::truncate_preview;
use parley_types::chat::{CacheStats, ChatLogRecord, LogStats, RateLimitStatus};

/// Print log records as a table, newest first, with truncated text.
pub fn print_log_records(records: &[ChatLogRecord], preview_chars: usize) {
    if records.is_empty() {
        println!();
        println!("  {} No chat history yet.", style("i").blue().bold());
        println!();
        return;
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Time").fg(Color::White),
        Cell::new("Prompt").fg(Color::White),
        Cell::new("Response").fg(Color::White),
        Cell::new("Tokens").fg(Color::White),
        Cell::new("Source").fg(Color::White),
    ]);

    for record in records {
        let source = if record.was_cached {
            Cell::new("cached").fg(Color::Green)
        } else {
            Cell::new("api").fg(Color::Cyan)
        };
        table.add_row(vec![
            Cell::new(record.id).fg(Color::DarkGrey),
            Cell::new(record.created_at.format("%Y-%m-%d %H:%M:%S")).fg(Color::DarkGrey),
            Cell::new(truncate_preview(&record.prompt, preview_chars)),
            Cell::new(truncate_preview(&record.response, preview_chars)),
            Cell::new(record.tokens_used),
            source,
        ]);
    }

    println!();
    println!("{table}");
    println!();
}

pub fn print_log_stats(stats: &LogStats) {
    println!();
    println!("  {}", style("── Chat log ──").dim());
    println!("  Total entries:   {}", style(stats.total_entries).bold());
    println!("  Tokens used:     {}", format_tokens(stats.total_tokens_used));
    println!("  Cached entries:  {}", stats.cached_entries);
    println!("  Cache hit rate:  {}%", stats.cache_hit_rate);
    match stats.latest_timestamp {
        Some(at) => println!("  Latest entry:    {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("  Latest entry:    {}", style("none").dim()),
    }
    println!();
}

pub fn print_cache_stats(stats: &CacheStats) {
    println!();
    println!("  {}", style("── Response cache ──").dim());
    println!("  Size:      {}/{} entries", stats.size, stats.max_size);
    println!("  Hit rate:  {}%", stats.hit_rate);
    println!("  Hits:      {}", stats.hits);
    println!("  Misses:    {}", stats.misses);
    println!("  TTL:       {} seconds", stats.ttl_seconds);
    println!();
}

pub fn print_rate_limit(status: &RateLimitStatus) {
    println!();
    println!("  {}", style("── Rate limit ──").dim());
    println!("  Requests per minute:  {}", status.requests_per_minute);
    println!("  Available tokens:     {}", status.available_tokens);
    println!("  Capacity:             {}", status.capacity);
    println!("  {}", next_token_line(status.time_until_next_token));
    println!();
}

/// How many turns the conversation currently remembers.
pub fn memory_status(turns_in_context: usize, exchanges: usize) -> String {
    let remembered = turns_in_context / 2;
    if remembered >= exchanges {
        format!("Remembering last {exchanges} turns (older messages forgotten)")
    } else {
        format!("Remembering {remembered} turn(s)")
    }
}

fn next_token_line(wait_secs: f64) -> String {
    if wait_secs > 0.0 {
        format!("Next token in:        {wait_secs:.1} seconds")
    } else {
        "Next token:           available now".to_string()
    }
}

pub fn format_tokens(n: i64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_status_below_window() {
        assert_eq!(memory_status(0, 4), "Remembering 0 turn(s)");
        assert_eq!(memory_status(2, 4), "Remembering 1 turn(s)");
        assert_eq!(memory_status(6, 4), "Remembering 3 turn(s)");
    }

    #[test]
    fn test_memory_status_full_window() {
        assert_eq!(
            memory_status(8, 4),
            "Remembering last 4 turns (older messages forgotten)"
        );
        assert_eq!(
            memory_status(4, 2),
            "Remembering last 2 turns (older messages forgotten)"
        );
    }

    #[test]
    fn test_next_token_line() {
        assert!(next_token_line(0.0).ends_with("available now"));
        assert!(next_token_line(4.26).contains("4.3 seconds"));
    }

    #[test]
    fn test_format_tokens() {
        assert_eq!(format_tokens(999), "999");
        assert_eq!(format_tokens(1_500), "1.5K");
        assert_eq!(format_tokens(2_000_000), "2.0M");
    }
}
