//! Guest usage limiting, chat flow, and port trait definitions for Mindneox.
//!
//! This crate defines the "ports" (storage, identity, and backend traits) that
//! the infrastructure layer implements. It depends only on `mindneox-types` --
//! never on `mindneox-infra` or any I/O crate.

pub mod chat;
pub mod identity;
pub mod limiter;
pub mod storage;
