//! Chat message and backend wire types.
//!
//! `ChatMessage` is what the chat surface renders. The remaining types mirror
//! the JSON exchanged with the remote chat backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in the local transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Set on the placeholder reply shown when the backend call failed.
    #[serde(default)]
    pub error: bool,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp,
            error: false,
        }
    }

    pub fn assistant(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp,
            error: false,
        }
    }
}

/// Timestamp as the backend sends it: ISO-8601 text or Unix seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Seconds(f64),
    Text(String),
}

/// One stored exchange from `GET /api/user/{id}/history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: RawTimestamp,
    pub user_message: String,
    pub assistant_response: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Body of `GET /api/user/{id}/history`. Entries arrive newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// Body of `GET /api/user/{id}/predict`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GreetingResponse {
    #[serde(default)]
    pub greeting: Option<String>,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub user_id: String,
    pub clerk_user_id: Option<String>,
    pub user_email: Option<String>,
    pub user_name: String,
}

/// Response of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub firebase_id: Option<String>,
    #[serde(default)]
    pub pinecone_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        let parsed: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(parsed, Role::User);
    }

    #[test]
    fn test_history_entry_accepts_text_and_numeric_timestamps() {
        let text: HistoryEntry = serde_json::from_str(
            r#"{"timestamp":"2025-01-02T03:04:05.123456","user_message":"hi","assistant_response":"hello","session_id":"s1"}"#,
        )
        .unwrap();
        assert!(matches!(text.timestamp, RawTimestamp::Text(_)));

        let numeric: HistoryEntry = serde_json::from_str(
            r#"{"timestamp":1735787045,"user_message":"hi","assistant_response":"hello"}"#,
        )
        .unwrap();
        assert_eq!(numeric.timestamp, RawTimestamp::Seconds(1735787045.0));
        assert!(numeric.session_id.is_none());
    }

    #[test]
    fn test_history_response_missing_history_is_empty() {
        let resp: HistoryResponse =
            serde_json::from_str(r#"{"status":"error","message":"Redis memory not enabled"}"#)
                .unwrap();
        assert!(resp.history.is_empty());
    }

    #[test]
    fn test_chat_reply_minimal() {
        let reply: ChatReply = serde_json::from_str(r#"{"response":"Hi there"}"#).unwrap();
        assert_eq!(reply.response, "Hi there");
        assert!(reply.firebase_id.is_none());
    }
}
