//! Chat service gating submissions through the guest usage limiter.
//!
//! `ChatService` owns the local transcript and runs each send as the chat
//! surface does: refuse empty input, refuse while gated, record the turn,
//! append the user message, call the backend, append the reply (or an error
//! placeholder). It also handles the sign-in prompt lifecycle: dismissal,
//! sign-in, and sign-out.

use chrono::Utc;
use mindneox_types::chat::{ChatMessage, ChatRequest, RawTimestamp};
use mindneox_types::config::GlobalConfig;
use mindneox_types::error::{BackendError, ChatError};
use mindneox_types::usage::UsageSnapshot;
use tracing::{debug, info, warn};

use crate::chat::backend::ChatBackend;
use crate::chat::transcript;
use crate::identity::IdentityProvider;
use crate::limiter::UsageLimiter;
use crate::storage::key_value::KeyValueStorage;

/// Result of a single `send`.
#[derive(Debug)]
pub enum SendOutcome {
    /// The backend answered. `prompt_sign_in` mirrors the limiter's prompt flag.
    Delivered {
        reply: ChatMessage,
        prompt_sign_in: bool,
    },
    /// The visitor is gated; nothing was recorded or sent.
    Blocked(UsageSnapshot),
    /// The turn was recorded but the backend call failed. An error placeholder
    /// was appended to the transcript.
    Failed {
        error: BackendError,
        prompt_sign_in: bool,
    },
}

/// Orchestrates chat submissions for one chat surface.
///
/// Generic over storage, identity, and backend ports (mindneox-core never
/// depends on mindneox-infra).
pub struct ChatService<S: KeyValueStorage, I: IdentityProvider, B: ChatBackend> {
    limiter: UsageLimiter<S, I>,
    backend: B,
    transcript: Vec<ChatMessage>,
    grace_on_dismiss: bool,
    history_limit: u32,
}

impl<S: KeyValueStorage, I: IdentityProvider, B: ChatBackend> ChatService<S, I, B> {
    pub fn new(limiter: UsageLimiter<S, I>, backend: B, config: &GlobalConfig) -> Self {
        Self {
            limiter,
            backend,
            transcript: Vec::new(),
            grace_on_dismiss: config.limiter.grace_on_dismiss,
            history_limit: config.backend.history_limit,
        }
    }

    /// Access the usage limiter.
    pub fn limiter(&self) -> &UsageLimiter<S, I> {
        &self.limiter
    }

    /// Messages shown in the chat surface, oldest first.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Submit a user message.
    ///
    /// At most one turn is recorded per call, and only after the gate check
    /// passes, so a blocked or empty submission never counts.
    pub async fn send(&mut self, text: &str) -> Result<SendOutcome, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        if self.limiter.is_limited() {
            debug!("submission blocked by guest usage limit");
            return Ok(SendOutcome::Blocked(self.limiter.snapshot()));
        }

        self.limiter.record_turn();
        let request = self.build_request(text);
        self.transcript.push(ChatMessage::user(text, Utc::now()));

        match self.backend.send_message(&request).await {
            Ok(reply) => {
                let at = reply
                    .timestamp
                    .map(RawTimestamp::Text)
                    .as_ref()
                    .and_then(transcript::parse_timestamp)
                    .unwrap_or_else(Utc::now);
                let message = ChatMessage::assistant(reply.response, at);
                self.transcript.push(message.clone());
                Ok(SendOutcome::Delivered {
                    reply: message,
                    prompt_sign_in: self.limiter.should_show_prompt(),
                })
            }
            Err(error) => {
                warn!(error = %error, "chat backend call failed");
                self.transcript.push(transcript::error_reply(Utc::now()));
                Ok(SendOutcome::Failed {
                    error,
                    prompt_sign_in: self.limiter.should_show_prompt(),
                })
            }
        }
    }

    /// The visitor closed the sign-in prompt to continue as a guest.
    ///
    /// With `grace_on_dismiss` the counter is zeroed, granting another block
    /// of free turns; otherwise only the prompt is hidden and the gate stays.
    pub fn dismiss_prompt(&mut self) {
        if self.grace_on_dismiss {
            info!("sign-in prompt dismissed, guest allowance renewed");
            self.limiter.reset();
        } else {
            debug!("sign-in prompt dismissed, limit stays in force");
            self.limiter.clear_prompt();
        }
    }

    /// The visitor just signed in: zero the guest counter and restore history.
    pub async fn on_signed_in(&mut self) -> Result<usize, ChatError> {
        self.limiter.reset();
        self.restore().await
    }

    /// The visitor signed out: the gate applies again from the stored count.
    pub fn on_signed_out(&mut self) {
        self.limiter.reload();
    }

    /// Replace the transcript with the signed-in visitor's backend history.
    ///
    /// Returns the number of messages in the restored transcript. No-op for
    /// anonymous visitors. A failed history fetch leaves the transcript as
    /// it was; a failed greeting fetch only drops the greeting.
    pub async fn restore(&mut self) -> Result<usize, ChatError> {
        let Some(visitor) = self.limiter.identity().current_visitor() else {
            return Ok(0);
        };

        let history = self
            .backend
            .fetch_history(&visitor.id, self.history_limit)
            .await
            .inspect_err(|e| warn!(visitor = %visitor.id, error = %e, "failed to load chat history"))?;

        let greeting = match self.backend.fetch_greeting(&visitor.id).await {
            Ok(greeting) => greeting,
            Err(e) => {
                warn!(visitor = %visitor.id, error = %e, "failed to load greeting");
                None
            }
        };

        let restored = transcript::assemble(history, &visitor, greeting, Utc::now());
        if !restored.is_empty() {
            self.transcript = restored;
        }
        info!(visitor = %visitor.id, messages = self.transcript.len(), "chat history restored");
        Ok(self.transcript.len())
    }

    fn build_request(&self, text: &str) -> ChatRequest {
        match self.limiter.identity().current_visitor() {
            Some(visitor) => ChatRequest {
                message: text.to_string(),
                user_id: visitor.id.0.clone(),
                user_name: visitor.greeting_name().to_string(),
                clerk_user_id: Some(visitor.id.0),
                user_email: visitor.email,
            },
            None => ChatRequest {
                message: text.to_string(),
                user_id: format!("anonymous_{}", Utc::now().timestamp_millis()),
                clerk_user_id: None,
                user_email: None,
                user_name: "Anonymous".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindneox_types::chat::{ChatReply, HistoryEntry, Role};
    use mindneox_types::error::StorageError;
    use mindneox_types::usage::{GUEST_COUNT_KEY, UsageState};
    use mindneox_types::visitor::{Visitor, VisitorId};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MemoryStorage {
        values: Mutex<HashMap<String, String>>,
    }

    impl KeyValueStorage for MemoryStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.values.lock().unwrap().remove(key);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockIdentity {
        visitor: Mutex<Option<Visitor>>,
    }

    impl MockIdentity {
        fn sign_in(&self, visitor: Visitor) {
            *self.visitor.lock().unwrap() = Some(visitor);
        }

        fn sign_out(&self) {
            *self.visitor.lock().unwrap() = None;
        }
    }

    impl IdentityProvider for MockIdentity {
        fn current_visitor(&self) -> Option<Visitor> {
            self.visitor.lock().unwrap().clone()
        }
    }

    #[derive(Default)]
    struct MockBackend {
        requests: Mutex<Vec<ChatRequest>>,
        fail_send: AtomicBool,
        fail_history: AtomicBool,
        fail_greeting: AtomicBool,
        history: Mutex<Vec<HistoryEntry>>,
        greeting: Mutex<Option<String>>,
    }

    impl MockBackend {
        fn sent(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl ChatBackend for MockBackend {
        async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply, BackendError> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail_send.load(Ordering::SeqCst) {
                return Err(BackendError::Transport("connection refused".to_string()));
            }
            Ok(ChatReply {
                response: format!("echo: {}", request.message),
                session_id: Some("s1".to_string()),
                timestamp: Some("2025-01-02T03:04:05".to_string()),
                firebase_id: None,
                pinecone_id: None,
            })
        }

        async fn fetch_history(
            &self,
            _visitor_id: &VisitorId,
            limit: u32,
        ) -> Result<Vec<HistoryEntry>, BackendError> {
            if self.fail_history.load(Ordering::SeqCst) {
                return Err(BackendError::Status {
                    status: 500,
                    body: "redis down".to_string(),
                });
            }
            let history = self.history.lock().unwrap();
            Ok(history.iter().take(limit as usize).cloned().collect())
        }

        async fn fetch_greeting(
            &self,
            _visitor_id: &VisitorId,
        ) -> Result<Option<String>, BackendError> {
            if self.fail_greeting.load(Ordering::SeqCst) {
                return Err(BackendError::Decode("bad json".to_string()));
            }
            Ok(self.greeting.lock().unwrap().clone())
        }
    }

    type TestService = ChatService<Arc<MemoryStorage>, Arc<MockIdentity>, Arc<MockBackend>>;

    struct Fixture {
        service: TestService,
        storage: Arc<MemoryStorage>,
        identity: Arc<MockIdentity>,
        backend: Arc<MockBackend>,
    }

    fn fixture(config: GlobalConfig) -> Fixture {
        let storage = Arc::new(MemoryStorage::default());
        let identity = Arc::new(MockIdentity::default());
        let backend = Arc::new(MockBackend::default());
        let limiter = UsageLimiter::new(storage.clone(), identity.clone(), &config.limiter);
        let service = ChatService::new(limiter, backend.clone(), &config);
        Fixture {
            service,
            storage,
            identity,
            backend,
        }
    }

    fn history_entry(user: &str, assistant: &str, secs: f64) -> HistoryEntry {
        HistoryEntry {
            timestamp: RawTimestamp::Seconds(secs),
            user_message: user.to_string(),
            assistant_response: assistant.to_string(),
            session_id: None,
        }
    }

    #[tokio::test]
    async fn send_delivers_and_records_turn() {
        let mut fx = fixture(GlobalConfig::default());

        let outcome = fx.service.send("hello").await.unwrap();
        match outcome {
            SendOutcome::Delivered {
                reply,
                prompt_sign_in,
            } => {
                assert_eq!(reply.content, "echo: hello");
                assert_eq!(reply.timestamp.timestamp(), 1_735_787_045);
                assert!(!prompt_sign_in);
            }
            other => panic!("expected Delivered, got {other:?}"),
        }

        assert_eq!(fx.service.limiter().current_count(), 1);
        assert_eq!(fx.service.transcript().len(), 2);
        assert_eq!(fx.service.transcript()[0].role, Role::User);
        assert_eq!(
            fx.storage.get(GUEST_COUNT_KEY).unwrap().as_deref(),
            Some("1")
        );
    }

    #[tokio::test]
    async fn anonymous_request_uses_anonymous_id() {
        let mut fx = fixture(GlobalConfig::default());
        fx.service.send("hi").await.unwrap();

        let requests = fx.backend.requests.lock().unwrap();
        assert!(requests[0].user_id.starts_with("anonymous_"));
        assert!(requests[0].clerk_user_id.is_none());
        assert_eq!(requests[0].user_name, "Anonymous");
    }

    #[tokio::test]
    async fn signed_in_request_carries_visitor_details() {
        let mut fx = fixture(GlobalConfig::default());
        fx.identity.sign_in(Visitor {
            id: VisitorId::new("user_42"),
            display_name: Some("Ada Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
        });

        fx.service.send("hi").await.unwrap();

        let requests = fx.backend.requests.lock().unwrap();
        assert_eq!(requests[0].user_id, "user_42");
        assert_eq!(requests[0].clerk_user_id.as_deref(), Some("user_42"));
        assert_eq!(requests[0].user_email.as_deref(), Some("ada@example.com"));
        assert_eq!(requests[0].user_name, "Ada Lovelace");
        drop(requests);
        assert_eq!(fx.service.limiter().current_count(), 0);
    }

    #[tokio::test]
    async fn empty_message_is_rejected_without_counting() {
        let mut fx = fixture(GlobalConfig::default());
        let err = fx.service.send("   \n").await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyMessage));
        assert_eq!(fx.service.limiter().current_count(), 0);
        assert_eq!(fx.backend.sent(), 0);
    }

    #[tokio::test]
    async fn fifth_send_prompts_and_sixth_is_blocked() {
        let mut fx = fixture(GlobalConfig::default());
        for i in 0..4 {
            match fx.service.send(&format!("message {i}")).await.unwrap() {
                SendOutcome::Delivered { prompt_sign_in, .. } => assert!(!prompt_sign_in),
                other => panic!("expected Delivered, got {other:?}"),
            }
        }

        match fx.service.send("message 4").await.unwrap() {
            SendOutcome::Delivered { prompt_sign_in, .. } => assert!(prompt_sign_in),
            other => panic!("expected Delivered, got {other:?}"),
        }

        match fx.service.send("message 5").await.unwrap() {
            SendOutcome::Blocked(snapshot) => {
                assert_eq!(snapshot.count, 5);
                assert_eq!(snapshot.state, UsageState::Gated);
            }
            other => panic!("expected Blocked, got {other:?}"),
        }
        assert_eq!(fx.backend.sent(), 5);
        assert_eq!(fx.service.limiter().current_count(), 5);
        assert_eq!(fx.service.transcript().len(), 10);
    }

    #[tokio::test]
    async fn backend_failure_keeps_turn_and_appends_error() {
        let mut fx = fixture(GlobalConfig::default());
        fx.backend.fail_send.store(true, Ordering::SeqCst);

        let outcome = fx.service.send("hello").await.unwrap();
        assert!(matches!(outcome, SendOutcome::Failed { .. }));
        assert_eq!(fx.service.limiter().current_count(), 1);

        let last = fx.service.transcript().last().unwrap();
        assert!(last.error);
        assert_eq!(last.content, transcript::ERROR_REPLY);
    }

    #[tokio::test]
    async fn dismiss_with_grace_renews_allowance() {
        let mut fx = fixture(GlobalConfig::default());
        for _ in 0..5 {
            fx.service.send("q").await.unwrap();
        }
        assert!(fx.service.limiter().is_limited());

        fx.service.dismiss_prompt();
        assert_eq!(fx.service.limiter().current_count(), 0);
        assert!(!fx.service.limiter().should_show_prompt());
        assert!(matches!(
            fx.service.send("again").await.unwrap(),
            SendOutcome::Delivered { .. }
        ));
    }

    #[tokio::test]
    async fn dismiss_without_grace_keeps_gate() {
        let mut config = GlobalConfig::default();
        config.limiter.grace_on_dismiss = false;
        let mut fx = fixture(config);
        for _ in 0..5 {
            fx.service.send("q").await.unwrap();
        }

        fx.service.dismiss_prompt();
        assert!(!fx.service.limiter().should_show_prompt());
        assert!(fx.service.limiter().is_limited());
        assert!(matches!(
            fx.service.send("again").await.unwrap(),
            SendOutcome::Blocked(_)
        ));
    }

    #[tokio::test]
    async fn sign_in_resets_counter_and_restores_history() {
        let mut fx = fixture(GlobalConfig::default());
        for _ in 0..5 {
            fx.service.send("q").await.unwrap();
        }
        *fx.backend.history.lock().unwrap() = vec![
            history_entry("newer", "newer reply", 200.0),
            history_entry("older", "older reply", 100.0),
        ];

        let mut visitor = Visitor::new("user_7");
        visitor.display_name = Some("Grace".to_string());
        fx.identity.sign_in(visitor);
        let restored = fx.service.on_signed_in().await.unwrap();

        assert_eq!(restored, 5);
        assert_eq!(fx.service.limiter().current_count(), 0);
        assert!(!fx.service.limiter().is_limited());
        let transcript = fx.service.transcript();
        assert!(transcript[0].content.contains("Welcome back, Grace!"));
        assert_eq!(transcript[1].content, "older");
        assert_eq!(transcript[4].content, "newer reply");
    }

    #[tokio::test]
    async fn restore_uses_greeting_and_ignores_greeting_failure() {
        let mut fx = fixture(GlobalConfig::default());
        *fx.backend.history.lock().unwrap() = vec![history_entry("q", "a", 100.0)];
        *fx.backend.greeting.lock().unwrap() = Some("Back for more Rust?".to_string());
        fx.identity.sign_in(Visitor::new("user_7"));

        fx.service.restore().await.unwrap();
        assert_eq!(fx.service.transcript()[0].content, "Back for more Rust?");

        fx.backend.fail_greeting.store(true, Ordering::SeqCst);
        fx.service.restore().await.unwrap();
        assert!(fx.service.transcript()[0].content.starts_with("Welcome back"));
    }

    #[tokio::test]
    async fn restore_failure_leaves_transcript() {
        let mut fx = fixture(GlobalConfig::default());
        fx.service.send("local message").await.unwrap();
        fx.identity.sign_in(Visitor::new("user_7"));
        fx.backend.fail_history.store(true, Ordering::SeqCst);

        let err = fx.service.restore().await.unwrap_err();
        assert!(matches!(err, ChatError::Backend(BackendError::Status { status: 500, .. })));
        assert_eq!(fx.service.transcript().len(), 2);
    }

    #[tokio::test]
    async fn restore_is_noop_for_anonymous_visitor() {
        let mut fx = fixture(GlobalConfig::default());
        *fx.backend.history.lock().unwrap() = vec![history_entry("q", "a", 100.0)];
        assert_eq!(fx.service.restore().await.unwrap(), 0);
        assert!(fx.service.transcript().is_empty());
    }

    #[tokio::test]
    async fn restore_respects_history_limit() {
        let mut config = GlobalConfig::default();
        config.backend.history_limit = 1;
        let mut fx = fixture(config);
        *fx.backend.history.lock().unwrap() = vec![
            history_entry("newest", "r3", 300.0),
            history_entry("middle", "r2", 200.0),
        ];
        fx.identity.sign_in(Visitor::new("user_7"));

        assert_eq!(fx.service.restore().await.unwrap(), 3);
        assert_eq!(fx.service.transcript()[1].content, "newest");
    }

    #[tokio::test]
    async fn sign_out_reapplies_stored_count() {
        let mut fx = fixture(GlobalConfig::default());
        for _ in 0..5 {
            fx.service.send("q").await.unwrap();
        }
        fx.identity.sign_in(Visitor::new("user_7"));
        assert!(!fx.service.limiter().is_limited());

        fx.identity.sign_out();
        fx.service.on_signed_out();
        assert!(fx.service.limiter().is_limited());
        assert!(matches!(
            fx.service.send("blocked").await.unwrap(),
            SendOutcome::Blocked(_)
        ));
    }
}
