//! Global configuration types for the Mindneox client.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls the
//! guest usage limiter and the chat backend connection.

use serde::{Deserialize, Serialize};

use crate::usage::{DEFAULT_CONVERSATION_LIMIT, GUEST_COUNT_KEY};

/// Top-level configuration for the client.
///
/// Loaded from `~/.mindneox/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub limiter: LimiterConfig,

    #[serde(default)]
    pub backend: BackendConfig,
}

/// Guest usage limiter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimiterConfig {
    /// Anonymous turns allowed before the sign-in gate closes.
    #[serde(default = "default_conversation_limit")]
    pub conversation_limit: u32,

    /// Storage key the counter is persisted under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Whether dismissing the sign-in prompt ("maybe later") also zeroes the
    /// counter, granting another block of free turns.
    #[serde(default = "default_grace_on_dismiss")]
    pub grace_on_dismiss: bool,
}

fn default_conversation_limit() -> u32 {
    DEFAULT_CONVERSATION_LIMIT
}

fn default_storage_key() -> String {
    GUEST_COUNT_KEY.to_string()
}

fn default_grace_on_dismiss() -> bool {
    true
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            conversation_limit: default_conversation_limit(),
            storage_key: default_storage_key(),
            grace_on_dismiss: default_grace_on_dismiss(),
        }
    }
}

/// Remote chat backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// History entries fetched when restoring a signed-in conversation.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_history_limit() -> u32 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            history_limit: default_history_limit(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
