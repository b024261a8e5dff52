//! Welcome banner display for chat sessions.

use console::style;

use parley_types::config::ParleyConfig;

/// Print the banner: model, limits, cache, memory window, and log location.
pub fn print_welcome_banner(config: &ParleyConfig, database: &std::path::Path) {
    println!();
    println!("  {} {}", style("*").cyan(), style("Parley").cyan().bold());
    println!(
        "  {}",
        style("Chat with memory, rate limiting, caching, and a chat log").dim()
    );
    println!();
    println!("  {}      {}", style("Model:").bold(), style(&config.model).dim());
    println!(
        "  {} {}",
        style("Rate limit:").bold(),
        style(format!(
            "{} requests per minute",
            config.rate_limit.requests_per_minute
        ))
        .dim()
    );
    println!(
        "  {}      {}",
        style("Cache:").bold(),
        style(format!(
            "LRU, {} entries, {}s TTL",
            config.cache.max_size, config.cache.ttl_secs
        ))
        .dim()
    );
    println!(
        "  {}     {}",
        style("Memory:").bold(),
        style(format!("last {} turns", config.memory.exchanges)).dim()
    );
    println!(
        "  {}   {}",
        style("Chat log:").bold(),
        style(database.display()).dim()
    );
    println!();
    println!(
        "  {}",
        style("Type /help for commands, /quit or Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
