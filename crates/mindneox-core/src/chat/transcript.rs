//! Transcript assembly from backend history.
//!
//! The history endpoint returns stored exchanges newest first, one entry per
//! user message + assistant reply. The chat surface wants a flat, oldest-first
//! list of messages headed by a welcome-back line.

use chrono::{DateTime, NaiveDateTime, Utc};
use mindneox_types::chat::{ChatMessage, HistoryEntry, RawTimestamp};
use mindneox_types::visitor::Visitor;
use tracing::debug;

/// Reply shown in place of an answer when the backend call fails.
pub const ERROR_REPLY: &str =
    "Sorry, I encountered an error. Please make sure the chat backend is running.";

/// Build the welcome-back line for a returning visitor.
pub fn welcome_back(visitor: &Visitor, now: DateTime<Utc>) -> ChatMessage {
    ChatMessage::assistant(
        format!(
            "Welcome back, {}! I remember our previous conversations. Let's continue!",
            visitor.greeting_name()
        ),
        now,
    )
}

/// Placeholder assistant message for a failed backend call.
pub fn error_reply(now: DateTime<Utc>) -> ChatMessage {
    ChatMessage {
        error: true,
        ..ChatMessage::assistant(ERROR_REPLY, now)
    }
}

/// Turn newest-first history into an oldest-first transcript.
///
/// - Each entry expands to a user message followed by the assistant reply,
///   both stamped with the entry's timestamp.
/// - Non-empty history is headed by [`welcome_back`].
/// - A personalized `greeting` replaces the heading line (or becomes the only
///   line when there is no history).
pub fn assemble(
    history: Vec<HistoryEntry>,
    visitor: &Visitor,
    greeting: Option<String>,
    now: DateTime<Utc>,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() * 2 + 1);

    let heading = match greeting {
        Some(text) if !text.trim().is_empty() => Some(ChatMessage::assistant(text, now)),
        _ if !history.is_empty() => Some(welcome_back(visitor, now)),
        _ => None,
    };
    messages.extend(heading);

    for entry in history.into_iter().rev() {
        let at = parse_timestamp(&entry.timestamp).unwrap_or_else(|| {
            debug!(timestamp = ?entry.timestamp, "unparsable history timestamp, using now");
            now
        });
        messages.push(ChatMessage::user(entry.user_message, at));
        messages.push(ChatMessage::assistant(entry.assistant_response, at));
    }

    messages
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339, naive ISO-8601 (taken as UTC), and Unix seconds.
pub fn parse_timestamp(raw: &RawTimestamp) -> Option<DateTime<Utc>> {
    match raw {
        RawTimestamp::Seconds(secs) => {
            if !secs.is_finite() {
                return None;
            }
            let whole = secs.floor();
            let nanos = ((secs - whole) * 1e9) as u32;
            DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
        }
        RawTimestamp::Text(text) => {
            let text = text.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
                return Some(dt.with_timezone(&Utc));
            }
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        }
    }
}
