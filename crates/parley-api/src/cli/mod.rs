//! CLI command definitions for the `parley` binary.
//!
//! Uses clap derive macros. Without a subcommand the interactive chat loop
//! starts.

pub mod chat;
pub mod display;
pub mod history;
pub mod stats;

use clap::{Parser, Subcommand};

/// Chat with Gemini behind a rate limiter, response cache, and chat log.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Detailed logs (-v for info/debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to stderr as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start an interactive chat session (default).
    Chat,

    /// Start the REST API server.
    Serve {
        /// Port to listen on (default from config, 8000).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (default from config, 127.0.0.1).
        #[arg(long)]
        host: Option<String>,
    },

    /// Show recent chat log entries.
    History {
        /// Number of entries to show.
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },

    /// Show chat log statistics.
    Stats,

    /// Delete every chat log entry.
    #[command(name = "clear-history")]
    ClearHistory {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["parley"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_serve_flags() {
        let cli = Cli::try_parse_from(["parley", "serve", "--port", "9000", "--host", "0.0.0.0"])
            .unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Serve {
                port: Some(9000),
                host: Some("0.0.0.0".to_string()),
            })
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["parley", "history", "-l", "5", "--json", "-vv"]).unwrap();
        assert_eq!(cli.command, Some(Commands::History { limit: 5 }));
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_clear_history_yes() {
        let cli = Cli::try_parse_from(["parley", "clear-history", "--yes"]).unwrap();
        assert_eq!(cli.command, Some(Commands::ClearHistory { yes: true }));
    }

    #[test]
    fn test_clap_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
