//! Application state wiring the limiter and chat service to concrete adapters.
//!
//! Core types are generic over storage/identity/backend ports; AppState pins
//! them to the guest storage, the local session, and the HTTP backend.

use std::sync::Arc;

use anyhow::Context;
use mindneox_core::chat::service::ChatService;
use mindneox_core::limiter::UsageLimiter;
use mindneox_infra::config::load_global_config;
use mindneox_infra::filesystem::resolve_data_dir;
use mindneox_infra::http::HttpChatBackend;
use mindneox_infra::identity::SessionIdentity;
use mindneox_infra::storage::guest::GuestStorage;
use mindneox_types::config::GlobalConfig;

/// Concrete type aliases for the core generics pinned to infra implementations.
pub type ConcreteLimiter = UsageLimiter<Arc<GuestStorage>, Arc<SessionIdentity>>;

pub type ConcreteChatService =
    ChatService<Arc<GuestStorage>, Arc<SessionIdentity>, HttpChatBackend>;

/// Shared state for all CLI commands.
pub struct AppState {
    pub config: GlobalConfig,
    pub identity: Arc<SessionIdentity>,
    pub storage: Arc<GuestStorage>,
}

impl AppState {
    /// Resolve the data directory, load config, the stored session and the
    /// guest counter storage.
    ///
    /// An unwritable data directory is not fatal: the guest counter is then
    /// kept in memory for this run.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        if let Err(e) = tokio::fs::create_dir_all(&data_dir).await {
            tracing::warn!(data_dir = %data_dir.display(), error = %e, "failed to create data directory");
        }

        let config = load_global_config(&data_dir).await;
        let identity = Arc::new(SessionIdentity::in_data_dir(&data_dir));
        let storage = Arc::new(GuestStorage::in_data_dir(&data_dir));

        tracing::debug!(
            data_dir = %data_dir.display(),
            persistent = storage.is_persistent(),
            "application state initialized"
        );

        Ok(Self {
            config,
            identity,
            storage,
        })
    }

    /// A limiter over the guest counter.
    pub fn limiter(&self) -> ConcreteLimiter {
        UsageLimiter::new(
            Arc::clone(&self.storage),
            Arc::clone(&self.identity),
            &self.config.limiter,
        )
    }

    /// A chat service talking to the configured backend.
    pub fn chat_service(&self) -> anyhow::Result<ConcreteChatService> {
        self.chat_service_with(&self.config)
    }

    /// A chat service built from an adjusted copy of the config.
    pub fn chat_service_with(&self, config: &GlobalConfig) -> anyhow::Result<ConcreteChatService> {
        let backend = HttpChatBackend::new(&config.backend)
            .context("failed to set up the chat backend client")?;
        let limiter = UsageLimiter::new(
            Arc::clone(&self.storage),
            Arc::clone(&self.identity),
            &config.limiter,
        );
        Ok(ChatService::new(limiter, backend, config))
    }
}
