//! Mindneox command-line chat client.
//!
//! Binary name: `mindneox`
//!
//! Parses CLI arguments, sets up tracing, loads config and the local session,
//! then dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use mindneox_observe::tracing_setup::{init_tracing, shutdown_tracing, LogFormat, TracingOptions};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,mindneox=debug",
        _ => "trace",
    };

    init_tracing(&TracingOptions {
        default_directives: filter,
        format: if cli.log_json {
            LogFormat::Json
        } else {
            LogFormat::Text
        },
        otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;

    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "mindneox", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;

    match cli.command {
        Commands::Usage { action } => {
            cli::usage::handle_usage_command(action, &state, cli.json)?;
        }

        Commands::Login {
            visitor_id,
            name,
            email,
        } => {
            cli::session::login(&state, &visitor_id, name, email, cli.json)?;
        }

        Commands::Logout => {
            cli::session::logout(&state, cli.json)?;
        }

        Commands::History { limit } => {
            cli::history::show_history(&state, limit, cli.json).await?;
        }

        Commands::Chat => {
            cli::chat::run_chat(&state).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
