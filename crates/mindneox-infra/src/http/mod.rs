//! HTTP adapter for the remote chat backend.
//!
//! Implements the `ChatBackend` trait from `mindneox-core` over reqwest.

pub mod client;

pub use client::HttpChatBackend;
