//! Slash command parsing and help for the chat loop.
//!
//! Commands start with `/`. The bare words `quit`, `exit`, and `bye` also
//! end the session; any other line is a prompt.

use console::style;

/// Available commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// End the session.
    Quit,
    /// Forget the remembered conversation.
    ClearMemory,
    /// Show the remembered conversation.
    History,
    /// Show rate limiter status.
    Status,
    /// Show response cache statistics.
    Cache,
    /// Empty the response cache.
    ClearCache,
    /// Show chat log statistics.
    DbStats,
    /// Show the latest chat log records.
    DbHistory,
    /// Delete every chat log record.
    ClearDb,
    Help,
    Unknown(String),
}

/// Parse user input as a command.
///
/// Returns `None` if the input is a prompt.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    let lowered = trimmed.to_lowercase();

    if matches!(lowered.as_str(), "quit" | "exit" | "bye") {
        return Some(ChatCommand::Quit);
    }
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = lowered.split_whitespace().next().unwrap_or_default();
    let command = match cmd {
        "/quit" | "/exit" | "/bye" | "/q" => ChatCommand::Quit,
        "/clear" => ChatCommand::ClearMemory,
        "/history" => ChatCommand::History,
        "/status" => ChatCommand::Status,
        "/cache" => ChatCommand::Cache,
        "/clear-cache" => ChatCommand::ClearCache,
        "/db-stats" => ChatCommand::DbStats,
        "/db-history" => ChatCommand::DbHistory,
        "/clear-db" => ChatCommand::ClearDb,
        "/help" | "/h" | "/?" => ChatCommand::Help,
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

/// Print the help text listing all available commands.
pub fn print_help() {
    const COMMANDS: &[(&str, &str)] = &[
        ("/quit", "End the chat session (also /exit, /bye)"),
        ("/clear", "Forget the conversation"),
        ("/history", "Show the remembered conversation"),
        ("/status", "Show rate limit status"),
        ("/cache", "Show response cache statistics"),
        ("/clear-cache", "Clear the response cache"),
        ("/db-stats", "Show chat log statistics"),
        ("/db-history", "Show the last 10 chat log entries"),
        ("/clear-db", "Delete all chat log entries"),
        ("/help", "Show this help message"),
    ];

    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (name, description) in COMMANDS {
        println!("  {:<14}{}", style(name).cyan(), description);
    }
    println!();
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quit_variants() {
        for input in ["/quit", "/exit", "/bye", "/q", "quit", "EXIT", "  bye  "] {
            assert_eq!(parse(input), Some(ChatCommand::Quit), "{input}");
        }
    }

    #[test]
    fn test_parse_admin_commands() {
        assert_eq!(parse("/clear"), Some(ChatCommand::ClearMemory));
        assert_eq!(parse("/history"), Some(ChatCommand::History));
        assert_eq!(parse("/status"), Some(ChatCommand::Status));
        assert_eq!(parse("/cache"), Some(ChatCommand::Cache));
        assert_eq!(parse("/clear-cache"), Some(ChatCommand::ClearCache));
        assert_eq!(parse("/db-stats"), Some(ChatCommand::DbStats));
        assert_eq!(parse("/db-history"), Some(ChatCommand::DbHistory));
        assert_eq!(parse("/clear-db"), Some(ChatCommand::ClearDb));
        assert_eq!(parse("/HELP"), Some(ChatCommand::Help));
    }

    #[test]
    fn test_parse_prompt_is_not_command() {
        assert_eq!(parse("hello world"), None);
        assert_eq!(parse("clear my schedule"), None);
        assert_eq!(parse("quit smoking tips?"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("/foo bar"), Some(ChatCommand::Unknown("/foo".to_string())));
    }
}
