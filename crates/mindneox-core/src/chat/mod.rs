//! Chat submission flow and transcript handling.
//!
//! `ChatService` runs each submission through the guest usage limiter before
//! calling the `ChatBackend` port. Backend implementations live in
//! mindneox-infra.

pub mod backend;
pub mod service;
pub mod transcript;
