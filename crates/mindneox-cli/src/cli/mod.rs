//! CLI command definitions for the `mindneox` binary.
//!
//! Uses clap derive macros for argument parsing. Usage-counter management
//! lives under `mindneox usage`; `chat` runs the interactive chat surface.

pub mod chat;
pub mod history;
pub mod session;
pub mod usage;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat with Mindneox from the terminal.
#[derive(Parser)]
#[command(name = "mindneox", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to stderr as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect or manage the guest conversation counter.
    Usage {
        #[command(subcommand)]
        action: usage::UsageCommand,
    },

    /// Sign in locally as a visitor.
    Login {
        /// Visitor id issued by the auth provider (e.g. user_2abc).
        visitor_id: String,

        /// Display name used in greetings.
        #[arg(long)]
        name: Option<String>,

        /// Email address sent along with chat requests.
        #[arg(long)]
        email: Option<String>,
    },

    /// Sign out of the local session.
    Logout,

    /// Print the signed-in visitor's conversation history.
    History {
        /// Number of stored exchanges to fetch (defaults to config).
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Start an interactive chat.
    Chat,

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

/// A steady-ticking spinner with the house style.
pub fn spinner(message: impl Into<String>) -> anyhow::Result<indicatif::ProgressBar> {
    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_style(
        indicatif::ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?,
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    Ok(spinner)
}
