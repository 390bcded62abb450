//! Span and field names shared across the workspace.
//!
//! All constants are string slices usable in `tracing::span!` and
//! `tracing::info_span!` names.

// --- Span names ---

/// One chat submission, from gate check to backend reply.
pub const SPAN_CHAT_SEND: &str = "chat.send";

/// History restore after sign-in.
pub const SPAN_CHAT_RESTORE: &str = "chat.restore";

// --- Field names ---

/// Guest turns recorded so far.
pub const GUEST_USAGE_COUNT: &str = "guest_usage.count";

/// Configured guest turn limit.
pub const GUEST_USAGE_LIMIT: &str = "guest_usage.limit";

/// Gate state (`unrestricted` / `gated`).
pub const GUEST_USAGE_STATE: &str = "guest_usage.state";

/// Whether a visitor is signed in.
pub const VISITOR_AUTHENTICATED: &str = "visitor.authenticated";
