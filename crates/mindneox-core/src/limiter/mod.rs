//! Guest usage limiter.
//!
//! `UsageLimiter` counts the chat turns an anonymous visitor starts, persists
//! the count through a [`KeyValueStorage`], and reports when the configured
//! limit is reached so the chat surface can block sending and ask the visitor
//! to sign in.
//!
//! Two signals are exposed and kept separate:
//! - [`UsageLimiter::is_limited`]: anonymous and at/over the limit right now.
//!   Used to block submission.
//! - [`UsageLimiter::should_show_prompt`]: set when a recorded turn reaches
//!   the limit. Used to open the sign-in prompt once.
//!
//! Storage failures never escape. A failed read counts as zero prior turns;
//! a failed write leaves the in-memory count in charge until the process ends.

use mindneox_types::config::LimiterConfig;
use mindneox_types::usage::{UsageSnapshot, UsageState};
use tracing::{debug, info, warn};

use crate::identity::IdentityProvider;
use crate::storage::key_value::KeyValueStorage;

/// Counter of anonymous chat turns with a fixed ceiling.
///
/// Generic over the storage and identity ports so tests can inject doubles
/// and the application can pin real adapters.
pub struct UsageLimiter<S: KeyValueStorage, I: IdentityProvider> {
    storage: S,
    identity: I,
    storage_key: String,
    limit: u32,
    count: u32,
    show_prompt: bool,
}

impl<S: KeyValueStorage, I: IdentityProvider> UsageLimiter<S, I> {
    /// Create a limiter, loading the persisted count (or zero).
    ///
    /// A limit of 0 is raised to 1. The prompt flag always starts cleared,
    /// even when the stored count is already at the limit.
    pub fn new(storage: S, identity: I, config: &LimiterConfig) -> Self {
        let limit = config.conversation_limit.max(1);
        if config.conversation_limit == 0 {
            warn!("conversation_limit of 0 is not allowed, using 1");
        }

        let count = read_count(&storage, &config.storage_key);
        debug!(key = %config.storage_key, count, limit, "guest usage limiter loaded");

        Self {
            storage,
            identity,
            storage_key: config.storage_key.clone(),
            limit,
            count,
            show_prompt: false,
        }
    }

    /// Access the identity provider.
    pub fn identity(&self) -> &I {
        &self.identity
    }

    /// Turns recorded since the last reset.
    ///
    /// Still readable for signed-in visitors, but only gates anonymous ones.
    pub fn current_count(&self) -> u32 {
        self.count
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Turns left before the gate closes (saturating).
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.count)
    }

    /// True iff the visitor is anonymous and the count is at or over the limit.
    pub fn is_limited(&self) -> bool {
        !self.identity.is_authenticated() && self.count >= self.limit
    }

    /// True once a recorded turn has reached the limit, until `reset`.
    pub fn should_show_prompt(&self) -> bool {
        self.show_prompt
    }

    pub fn state(&self) -> UsageState {
        if self.is_limited() {
            UsageState::Gated
        } else {
            UsageState::Unrestricted
        }
    }

    /// Record one user-initiated chat turn.
    ///
    /// For an anonymous visitor the count goes up by exactly one and is written
    /// to storage before this returns. Reaching the limit raises the prompt
    /// flag. Signed-in visitors are not counted.
    pub fn record_turn(&mut self) -> UsageState {
        if self.identity.is_authenticated() {
            debug!("turn by signed-in visitor, not counted");
            return self.state();
        }

        let before = self.state();
        self.count = self.count.saturating_add(1);
        self.persist();

        if self.count >= self.limit {
            self.show_prompt = true;
        }

        let after = self.state();
        if before != after {
            info!(count = self.count, limit = self.limit, "guest usage limit reached");
        } else {
            debug!(count = self.count, limit = self.limit, "guest turn recorded");
        }
        after
    }

    /// Zero the count and clear the prompt flag.
    pub fn reset(&mut self) {
        self.count = 0;
        self.show_prompt = false;
        self.persist();
        debug!(key = %self.storage_key, "guest usage counter reset");
    }

    /// Hide the sign-in prompt without touching the count.
    pub fn clear_prompt(&mut self) {
        self.show_prompt = false;
    }

    /// Re-read the persisted count, e.g. after the visitor signs out.
    pub fn reload(&mut self) {
        self.count = read_count(&self.storage, &self.storage_key);
        debug!(count = self.count, "guest usage counter reloaded");
    }

    pub fn snapshot(&self) -> UsageSnapshot {
        UsageSnapshot {
            count: self.count,
            limit: self.limit,
            remaining: self.remaining(),
            authenticated: self.identity.is_authenticated(),
            limited: self.is_limited(),
            show_prompt: self.show_prompt,
            state: self.state(),
        }
    }

    fn persist(&self) {
        if let Err(e) = self.storage.set(&self.storage_key, &self.count.to_string()) {
            warn!(
                key = %self.storage_key,
                count = self.count,
                error = %e,
                "failed to persist guest usage count, keeping in-memory value"
            );
        }
    }
}

/// Read the stored count, treating anything unreadable as zero.
fn read_count<S: KeyValueStorage>(storage: &S, key: &str) -> u32 {
    match storage.get(key) {
        Ok(Some(raw)) => match raw.trim().parse::<u32>() {
            Ok(count) => count,
            Err(e) => {
                warn!(key, value = %raw, error = %e, "invalid stored guest usage count, starting from 0");
                0
            }
        },
        Ok(None) => 0,
        Err(e) => {
            warn!(key, error = %e, "failed to read guest usage count, starting from 0");
            0
        }
    }
}
