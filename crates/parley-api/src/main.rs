//! Parley CLI and REST API entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, loads configuration, wires the orchestrator, then
//! runs the interactive chat loop, a one-shot log command, or the REST API
//! server.

mod cli;
mod http;
mod state;

use clap::Parser;
use console::style;

use parley_observe::{LogFormat, TracingOptions};

use cli::{Cli, Commands};
use state::{AppState, RuntimeConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    parley_infra::config::load_dotenv();

    parley_observe::init_tracing(&TracingOptions {
        verbosity: cli.verbose,
        format: if cli.log_json {
            LogFormat::Json
        } else {
            LogFormat::Compact
        },
        otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    parley_observe::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let runtime = RuntimeConfig::load().await?;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let state = AppState::init(runtime).await?;
            cli::chat::loop_runner::run_chat_loop(&state).await?;
        }

        Commands::History { limit } => {
            let log = runtime.open_log().await?;
            cli::history::show_history(&log, limit, cli.json).await?;
        }

        Commands::Stats => {
            let log = runtime.open_log().await?;
            cli::stats::show_stats(&log, cli.json).await?;
        }

        Commands::ClearHistory { yes } => {
            let log = runtime.open_log().await?;
            cli::history::clear_history(&log, yes, cli.json).await?;
        }

        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| runtime.config.server.host.clone());
            let port = port.unwrap_or(runtime.config.server.port);
            let state = AppState::init(runtime).await?;

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Parley API listening on {}",
                style("⚡").bold(),
                style(format!("http://{addr}")).cyan()
            );
            println!("  {}", style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
