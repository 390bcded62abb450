//! Infrastructure layer for the Mindneox client.
//!
//! Contains implementations of the port traits defined in `mindneox-core`:
//! key-value storage (in-memory and JSON file), the local sign-in session,
//! and the HTTP chat backend, plus config loading and data-dir resolution.

pub mod config;
pub mod filesystem;
pub mod http;
pub mod identity;
pub mod storage;
