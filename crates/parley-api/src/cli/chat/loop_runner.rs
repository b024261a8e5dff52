//! Main chat loop.
//!
//! Reads lines, dispatches slash commands, and sends everything else through
//! the orchestrator with a spinner. After each reply it reports how much
//! conversation is remembered and whether the answer came from the cache.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use parley_core::chat::tokens::truncate_preview;
use parley_types::chat::{ChatReply, MessageRole};
use parley_types::error::ChatError;

use crate::cli::display;
use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};

const CONTEXT_PREVIEW_CHARS: usize = 100;
const LOG_PREVIEW_CHARS: usize = 50;
const LOG_HISTORY_LIMIT: u32 = 10;

/// What the loop should do after handling a command.
enum Flow {
    Continue,
    Quit,
}

/// Run the interactive chat loop until `/quit` or Ctrl+D.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    print_welcome_banner(&state.runtime.config, &state.runtime.database_path);

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Goodbye! Thanks for chatting.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!(
                    "\n  {}",
                    style("Interrupted. Type /quit or press Ctrl+D to exit.").dim()
                );
            }
            InputEvent::Line(text) if text.is_empty() => {
                println!(
                    "  {} Please enter a message, or /quit to exit.",
                    style("!").yellow().bold()
                );
            }
            InputEvent::Line(text) => {
                if let Some(command) = commands::parse(&text) {
                    if let Flow::Quit = run_command(state, command).await {
                        println!("\n  {}", style("Goodbye! Thanks for chatting.").dim());
                        break;
                    }
                    continue;
                }
                send_prompt(state, &text).await;
            }
        }
    }

    Ok(())
}

async fn send_prompt(state: &AppState, text: &str) {
    let orchestrator = &state.orchestrator;

    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = orchestrator.chat(text).await;
    spinner.finish_and_clear();

    match result {
        Ok(reply) => print_reply(state, &reply),
        Err(ChatError::RateLimited { message, .. }) => {
            println!("\n  {} {message}", style("✗").red().bold());
            println!(
                "  {}",
                style("You can check rate limit status with /status.").dim()
            );
            println!();
        }
        Err(e) => {
            println!("\n  {} Error during chat: {e}", style("!").red().bold());
            println!(
                "  {}",
                style("Please try again or type /quit to exit.").dim()
            );
            println!();
        }
    }
}

fn print_reply(state: &AppState, reply: &ChatReply) {
    let orchestrator = &state.orchestrator;

    println!();
    println!("  {} {}", style("Assistant >").cyan().bold(), reply.response.trim());
    println!();

    let context = orchestrator.context();
    let memory = display::memory_status(context.len(), context.exchanges());
    let source = if reply.was_cached {
        "cached response"
    } else {
        "new API call"
    };
    let hit_rate = orchestrator.cache().stats().hit_rate;

    println!("  {}", style(format!("Memory: {memory}")).dim());
    println!(
        "  {}",
        style(format!(
            "({source}) | Cache: {hit_rate}% hit rate | {} tokens",
            reply.tokens_used
        ))
        .dim()
    );
    println!();
}

async fn run_command(state: &AppState, command: ChatCommand) -> Flow {
    let orchestrator = &state.orchestrator;

    match command {
        ChatCommand::Quit => return Flow::Quit,
        ChatCommand::Help => commands::print_help(),
        ChatCommand::ClearMemory => {
            orchestrator.context().clear();
            println!("  {} Conversation memory cleared.", style("✓").green().bold());
        }
        ChatCommand::History => print_context(state),
        ChatCommand::Status => display::print_rate_limit(&orchestrator.limiter().status()),
        ChatCommand::Cache => display::print_cache_stats(&orchestrator.cache().stats()),
        ChatCommand::ClearCache => {
            orchestrator.cache().clear();
            println!("  {} Response cache cleared.", style("✓").green().bold());
        }
        ChatCommand::DbStats => match orchestrator.log_stats().await {
            Ok(stats) => display::print_log_stats(&stats),
            Err(e) => print_store_error(&e),
        },
        ChatCommand::DbHistory => match orchestrator.history(LOG_HISTORY_LIMIT).await {
            Ok(records) => display::print_log_records(&records, LOG_PREVIEW_CHARS),
            Err(e) => print_store_error(&e),
        },
        ChatCommand::ClearDb => match orchestrator.clear_log().await {
            Ok(deleted) => println!(
                "  {} Cleared {deleted} chat log entries.",
                style("✓").green().bold()
            ),
            Err(e) => print_store_error(&e),
        },
        ChatCommand::Unknown(name) => println!(
            "  {} Unknown command: {}. Type /help for available commands.",
            style("?").yellow().bold(),
            style(name).dim()
        ),
    }

    Flow::Continue
}

fn print_context(state: &AppState) {
    let turns = state.orchestrator.context().snapshot();
    if turns.is_empty() {
        println!("  {}", style("No conversation history yet.").dim());
        return;
    }

    println!();
    for (i, turn) in turns.iter().enumerate() {
        let label = match turn.role {
            MessageRole::User => style("You").green(),
            MessageRole::Assistant => style("Assistant").cyan(),
        };
        println!(
            "  {}. {}: {}",
            i + 1,
            label.bold(),
            truncate_preview(&turn.content, CONTEXT_PREVIEW_CHARS)
        );
    }
    println!();
}

fn print_store_error(e: &ChatError) {
    println!("  {} {e}", style("!").red().bold());
}
