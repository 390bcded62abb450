//! Conversation history for the signed-in visitor.

use anyhow::{Context, Result};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use mindneox_core::identity::IdentityProvider;
use mindneox_types::chat::{ChatMessage, Role};

use crate::state::AppState;

/// Fetch and print the assembled transcript.
pub async fn show_history(state: &AppState, limit: Option<u32>, json: bool) -> Result<()> {
    let Some(visitor) = state.identity.current_visitor() else {
        anyhow::bail!("History is only available when signed in. Use: mindneox login <visitor-id>");
    };

    let mut config = state.config.clone();
    if let Some(limit) = limit {
        config.backend.history_limit = limit;
    }
    let mut service = state.chat_service_with(&config)?;

    let spinner = (!json)
        .then(|| super::spinner(format!("Loading history for {}...", visitor.greeting_name())))
        .transpose()?;
    let result = service.restore().await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    result.context("failed to load conversation history")?;

    let transcript = service.transcript();

    if json {
        println!("{}", serde_json::to_string_pretty(transcript)?);
        return Ok(());
    }

    if transcript.is_empty() {
        println!();
        println!(
            "  {} No conversations yet for {}",
            style("i").blue().bold(),
            style(visitor.greeting_name()).cyan(),
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Time").fg(Color::White),
        Cell::new("From").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for message in transcript {
        let from = match message.role {
            Role::User => Cell::new("you").fg(Color::Cyan),
            Role::Assistant => Cell::new("mindneox").fg(Color::Green),
        };
        table.add_row(vec![
            Cell::new(message.timestamp.format("%Y-%m-%d %H:%M").to_string()).fg(Color::DarkGrey),
            from,
            Cell::new(&message.content),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} messages",
        style(transcript.len()).cyan()
    );
    println!();

    Ok(())
}

/// Print one chat message the way the interactive chat shows it.
pub fn print_message(message: &ChatMessage) {
    let time = message.timestamp.format("%H:%M");
    match message.role {
        Role::User => println!(
            "  {} {} {}",
            style(time).dim(),
            style("you").cyan().bold(),
            message.content
        ),
        Role::Assistant if message.error => println!(
            "  {} {} {}",
            style(time).dim(),
            style("mindneox").red().bold(),
            style(&message.content).red()
        ),
        Role::Assistant => println!(
            "  {} {} {}",
            style(time).dim(),
            style("mindneox").green().bold(),
            message.content
        ),
    }
}
