//! Interactive chat loop.
//!
//! Reads lines from stdin, sends them through `ChatService`, and handles the
//! sign-in prompt the limiter raises once a guest runs out of free turns.

pub mod commands;
pub mod input;

use anyhow::Result;
use console::style;
use tracing::Instrument;

use mindneox_core::chat::service::SendOutcome;
use mindneox_core::identity::IdentityProvider;
use mindneox_observe::attrs;
use mindneox_types::error::ChatError;
use mindneox_types::usage::UsageSnapshot;
use mindneox_types::visitor::Visitor;

use crate::cli::history::print_message;
use crate::cli::usage::print_snapshot;
use crate::state::{AppState, ConcreteChatService};

use commands::ChatCommand;
use input::{ChatInput, InputEvent};

/// Run the interactive chat until `/quit`, Ctrl+D, or Ctrl+C.
pub async fn run_chat(state: &AppState) -> Result<()> {
    let mut service = state.chat_service()?;

    print_banner(state, &service.limiter().snapshot());

    if state.identity.is_authenticated() {
        restore_history(&mut service).await;
    }

    let prompt = chat_prompt();
    let (mut input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let line = match input.read_line().await {
            InputEvent::Eof | InputEvent::Interrupted => {
                println!();
                break;
            }
            InputEvent::Message(line) => line,
        };
        if line.is_empty() {
            continue;
        }

        match commands::parse(&line) {
            Some(ChatCommand::Quit) => break,
            Some(ChatCommand::Help) => commands::print_help(),
            Some(ChatCommand::Usage) => print_snapshot(&service.limiter().snapshot()),
            Some(ChatCommand::Login { visitor_id, name }) => {
                let mut visitor = Visitor::new(visitor_id);
                visitor.display_name = name;
                if let Err(e) = state.identity.sign_in(visitor.clone()) {
                    println!(
                        "  {} Could not sign in: {e}",
                        style("!").red().bold()
                    );
                    continue;
                }
                println!(
                    "  {} Signed in as {}",
                    style("ok").green(),
                    style(visitor.greeting_name()).cyan().bold()
                );
                sign_in_and_restore(&mut service).await;
            }
            Some(ChatCommand::Logout) => {
                if let Err(e) = state.identity.sign_out() {
                    println!(
                        "  {} Could not sign out: {e}",
                        style("!").red().bold()
                    );
                    continue;
                }
                service.on_signed_out();
                let snapshot = service.limiter().snapshot();
                println!(
                    "  {} Signed out. {} of {} free guest conversations left.",
                    style("ok").green(),
                    style(snapshot.remaining).cyan(),
                    snapshot.limit
                );
            }
            Some(ChatCommand::Unknown(cmd)) => {
                println!(
                    "  {} Unknown command: {} (try /help)",
                    style("?").yellow().bold(),
                    cmd
                );
            }
            None => send_line(&mut service, &mut input, &line).await?,
        }
    }

    println!("  {}", style("Goodbye!").dim());
    Ok(())
}

fn chat_prompt() -> String {
    format!("{} ", style(">").cyan().bold())
}

/// Send one message and handle the outcome.
async fn send_line(
    service: &mut ConcreteChatService,
    input: &mut ChatInput,
    line: &str,
) -> Result<()> {
    let before = service.limiter().snapshot();
    let span = tracing::info_span!(
        attrs::SPAN_CHAT_SEND,
        { attrs::GUEST_USAGE_COUNT } = before.count,
        { attrs::GUEST_USAGE_LIMIT } = before.limit,
        { attrs::VISITOR_AUTHENTICATED } = before.authenticated,
        { attrs::GUEST_USAGE_STATE } = tracing::field::Empty
    );

    let spinner = crate::cli::spinner("Thinking...").ok();
    let outcome = service.send(line).instrument(span.clone()).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    span.record(
        attrs::GUEST_USAGE_STATE,
        service.limiter().state().to_string().as_str(),
    );

    match outcome {
        Ok(SendOutcome::Delivered {
            reply,
            prompt_sign_in,
        }) => {
            print_message(&reply);
            if prompt_sign_in {
                offer_sign_in(service, input).await;
            }
        }
        Ok(SendOutcome::Failed {
            error,
            prompt_sign_in,
        }) => {
            if let Some(placeholder) = service.transcript().last() {
                print_message(placeholder);
            }
            println!("  {}", style(format!("({error})")).dim());
            if prompt_sign_in {
                offer_sign_in(service, input).await;
            }
        }
        Ok(SendOutcome::Blocked(snapshot)) => {
            print_limit_reached(&snapshot);
            offer_sign_in(service, input).await;
        }
        Err(ChatError::EmptyMessage) => {}
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

/// Show the sign-in call to action and ask whether to continue as a guest.
async fn offer_sign_in(service: &mut ConcreteChatService, input: &mut ChatInput) {
    let snapshot = service.limiter().snapshot();
    println!();
    println!(
        "  {} You've used all {} free conversations.",
        style("!").yellow().bold(),
        snapshot.limit
    );
    println!(
        "  Sign in with {} to keep chatting and have your history remembered.",
        style("/login <visitor-id>").cyan()
    );
    println!();

    input.update_prompt(&format!("{} ", style("Continue as guest for now? [y/N]").bold()));
    let answer = match input.read_line().await {
        InputEvent::Message(answer) => answer,
        InputEvent::Eof | InputEvent::Interrupted => String::new(),
    };
    input.update_prompt(&chat_prompt());

    if !commands::is_yes(&answer) {
        return;
    }

    service.dismiss_prompt();
    let after = service.limiter().snapshot();
    if after.limited {
        println!(
            "  {} Guest limit still applies. Sign in to keep chatting.",
            style("i").blue().bold()
        );
    } else {
        println!(
            "  {} {} more guest conversations.",
            style("ok").green(),
            style(after.remaining).cyan()
        );
    }
}

fn print_limit_reached(snapshot: &UsageSnapshot) {
    println!(
        "  {} Guest limit reached ({}/{}). Message not sent.",
        style("!").yellow().bold(),
        snapshot.count,
        snapshot.limit
    );
}

/// Reset the guest counter for a new sign-in and restore history.
async fn sign_in_and_restore(service: &mut ConcreteChatService) {
    let span = tracing::info_span!(attrs::SPAN_CHAT_RESTORE);
    let spinner = crate::cli::spinner("Restoring your conversations...").ok();
    let result = service.on_signed_in().instrument(span).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    print_restored(service, result);
}

async fn restore_history(service: &mut ConcreteChatService) {
    let span = tracing::info_span!(attrs::SPAN_CHAT_RESTORE);
    let spinner = crate::cli::spinner("Loading your conversations...").ok();
    let result = service.restore().instrument(span).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    print_restored(service, result);
}

fn print_restored(service: &ConcreteChatService, result: Result<usize, ChatError>) {
    match result {
        Ok(0) => {}
        Ok(_) => {
            println!();
            for message in service.transcript() {
                print_message(message);
            }
            println!();
        }
        Err(e) => {
            println!(
                "  {} Could not load your previous conversations: {}",
                style("!").yellow().bold(),
                e
            );
        }
    }
}

fn print_banner(state: &AppState, snapshot: &UsageSnapshot) {
    println!();
    println!("  {}", style("Mindneox").cyan().bold());
    match state.identity.current_visitor() {
        Some(visitor) => println!(
            "  {}  {}",
            style("Signed in:").bold(),
            style(visitor.greeting_name()).green()
        ),
        None => println!(
            "  {}  {} of {} free conversations left",
            style("Guest:").bold(),
            style(snapshot.remaining).cyan(),
            snapshot.limit
        ),
    }
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
}
