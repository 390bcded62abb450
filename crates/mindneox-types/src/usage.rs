//! Guest usage types.
//!
//! These types describe how far an anonymous visitor is into their free
//! conversation allowance and whether the sign-in gate is closed.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Free conversation turns an anonymous visitor gets before the gate closes.
pub const DEFAULT_CONVERSATION_LIMIT: u32 = 5;

/// Storage key the guest turn counter is persisted under.
pub const GUEST_COUNT_KEY: &str = "guestConversationCount";

/// Gate state derived from identity and the stored count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageState {
    /// Signed in, or anonymous and still under the limit.
    Unrestricted,
    /// Anonymous and at or over the limit.
    Gated,
}

impl fmt::Display for UsageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageState::Unrestricted => write!(f, "unrestricted"),
            UsageState::Gated => write!(f, "gated"),
        }
    }
}

/// Point-in-time view of the limiter, for display and JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub count: u32,
    pub limit: u32,
    /// Turns left before the gate closes (0 once gated).
    pub remaining: u32,
    pub authenticated: bool,
    pub limited: bool,
    pub show_prompt: bool,
    pub state: UsageState,
}
