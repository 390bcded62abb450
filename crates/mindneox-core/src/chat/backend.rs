//! Chat backend trait.
//!
//! Defines the interface to the remote chat service: sending a message,
//! fetching a signed-in visitor's history, and fetching a personalized
//! greeting. Uses RPITIT (native async fn in traits, Rust 2024 edition).
//! Implementations live in mindneox-infra.

use std::sync::Arc;

use mindneox_types::chat::{ChatReply, ChatRequest, HistoryEntry};
use mindneox_types::error::BackendError;
use mindneox_types::visitor::VisitorId;

pub trait ChatBackend: Send + Sync {
    /// Send one user message and wait for the assistant reply.
    fn send_message(
        &self,
        request: &ChatRequest,
    ) -> impl std::future::Future<Output = Result<ChatReply, BackendError>> + Send;

    /// Fetch up to `limit` stored exchanges, newest first.
    fn fetch_history(
        &self,
        visitor_id: &VisitorId,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<HistoryEntry>, BackendError>> + Send;

    /// Fetch a greeting tailored to the visitor's past topics, if any.
    fn fetch_greeting(
        &self,
        visitor_id: &VisitorId,
    ) -> impl std::future::Future<Output = Result<Option<String>, BackendError>> + Send;
}

impl<T: ChatBackend> ChatBackend for Arc<T> {
    fn send_message(
        &self,
        request: &ChatRequest,
    ) -> impl std::future::Future<Output = Result<ChatReply, BackendError>> + Send {
        (**self).send_message(request)
    }

    fn fetch_history(
        &self,
        visitor_id: &VisitorId,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<HistoryEntry>, BackendError>> + Send {
        (**self).fetch_history(visitor_id, limit)
    }

    fn fetch_greeting(
        &self,
        visitor_id: &VisitorId,
    ) -> impl std::future::Future<Output = Result<Option<String>, BackendError>> + Send {
        (**self).fetch_greeting(visitor_id)
    }
}
