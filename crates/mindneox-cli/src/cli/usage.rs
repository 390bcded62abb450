//! Guest usage counter subcommands: status, record, reset.

use anyhow::Result;
use clap::Subcommand;
use console::style;
use dialoguer::Confirm;

use mindneox_types::usage::{UsageSnapshot, UsageState};

use crate::state::AppState;

/// Guest usage subcommands.
#[derive(Subcommand)]
pub enum UsageCommand {
    /// Show the guest conversation count and gate state.
    Status,

    /// Record one guest chat turn (as a chat submission would).
    Record,

    /// Reset the guest conversation count to zero.
    Reset {
        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

/// Handle a usage subcommand.
pub fn handle_usage_command(cmd: UsageCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        UsageCommand::Status => usage_status(state, json),
        UsageCommand::Record => usage_record(state, json),
        UsageCommand::Reset { force } => usage_reset(state, force, json),
    }
}

fn usage_status(state: &AppState, json: bool) -> Result<()> {
    let snapshot = state.limiter().snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_snapshot(&snapshot);
        if !state.storage.is_persistent() {
            println!(
                "  {} Data directory is not writable; the count is kept for this run only.",
                style("!").yellow().bold()
            );
            println!();
        }
    }

    Ok(())
}

fn usage_record(state: &AppState, json: bool) -> Result<()> {
    let mut limiter = state.limiter();
    let after = limiter.record_turn();
    let snapshot = limiter.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!();
    if snapshot.authenticated {
        println!(
            "  {} Signed in, turn not counted",
            style("i").blue().bold()
        );
    } else {
        println!(
            "  {} Recorded guest turn {}/{}",
            style("ok").green(),
            style(snapshot.count).cyan(),
            snapshot.limit,
        );
        if after == UsageState::Gated {
            println!(
                "  {} Guest limit reached. Sign in with {} to keep chatting.",
                style("!").yellow().bold(),
                style("mindneox login <visitor-id>").cyan(),
            );
        }
    }
    println!();

    Ok(())
}

fn usage_reset(state: &AppState, force: bool, json: bool) -> Result<()> {
    let mut limiter = state.limiter();

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Reset the guest conversation count ({} of {} used)?",
                limiter.current_count(),
                limiter.limit()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    limiter.reset();

    if json {
        println!("{}", serde_json::to_string_pretty(&limiter.snapshot())?);
    } else {
        println!();
        println!(
            "  {} Guest conversation count reset ({} free conversations)",
            style("ok").green(),
            style(limiter.limit()).cyan(),
        );
        println!();
    }

    Ok(())
}

/// Print a usage snapshot as styled text.
pub fn print_snapshot(snapshot: &UsageSnapshot) {
    let state_label = match snapshot.state {
        UsageState::Unrestricted => style(snapshot.state.to_string()).green(),
        UsageState::Gated => style(snapshot.state.to_string()).red().bold(),
    };

    println!();
    println!("  {}", style("── Guest usage ──").dim());
    println!(
        "  {}  {}",
        style("Visitor:").bold(),
        if snapshot.authenticated {
            style("signed in").green()
        } else {
            style("guest").yellow()
        }
    );
    println!(
        "  {}  {} / {}",
        style("Used:").bold(),
        style(snapshot.count).cyan(),
        snapshot.limit
    );
    println!("  {}  {}", style("Remaining:").bold(), snapshot.remaining);
    println!("  {}  {}", style("State:").bold(), state_label);
    if snapshot.authenticated {
        println!(
            "  {}",
            style("Signed-in visitors are not limited.").dim()
        );
    }
    println!();
}
