//! Storage abstractions for the client.
//!
//! Implementations live in mindneox-infra.

pub mod key_value;
