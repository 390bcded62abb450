//! Local sign-in session commands.
//!
//! Signing in zeroes the guest counter, as the chat surface does when the
//! auth provider reports a new user.

use anyhow::{Context, Result};
use console::style;

use mindneox_core::identity::IdentityProvider;
use mindneox_types::visitor::Visitor;

use crate::state::AppState;

/// Sign in as `visitor_id`, resetting the guest counter.
pub fn login(
    state: &AppState,
    visitor_id: &str,
    name: Option<String>,
    email: Option<String>,
    json: bool,
) -> Result<()> {
    let visitor_id = visitor_id.trim();
    anyhow::ensure!(!visitor_id.is_empty(), "visitor id must not be empty");

    let mut visitor = Visitor::new(visitor_id);
    visitor.display_name = name;
    visitor.email = email;

    state
        .identity
        .sign_in(visitor.clone())
        .context("failed to save session")?;
    state.limiter().reset();

    if json {
        let result = serde_json::json!({
            "signed_in": visitor,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "  {} Signed in as {}",
            style("ok").green(),
            style(visitor.greeting_name()).cyan().bold(),
        );
        println!();
    }

    Ok(())
}

/// Sign out of the local session. The guest gate applies again.
pub fn logout(state: &AppState, json: bool) -> Result<()> {
    let previous = state.identity.current_visitor();
    state
        .identity
        .sign_out()
        .context("failed to clear session")?;

    if json {
        let result = serde_json::json!({
            "signed_out": previous.as_ref().map(|v| v.id.as_str()),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!();
    match previous {
        Some(visitor) => println!(
            "  {} Signed out {}",
            style("ok").green(),
            style(visitor.greeting_name()).cyan(),
        ),
        None => println!("  {} Not signed in", style("i").blue().bold()),
    }
    println!();

    Ok(())
}
