//! Shared domain types for the Mindneox chat client.
//!
//! This crate contains the types used across the workspace: visitor identity,
//! guest usage snapshots, chat wire types, configuration, and error enums.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod usage;
pub mod visitor;
