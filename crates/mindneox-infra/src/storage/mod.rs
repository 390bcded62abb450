//! Key-value storage adapters.
//!
//! Implements the `KeyValueStorage` trait from `mindneox-core`:
//! - [`memory::MemoryStorage`]: process-local map, clones share state.
//! - [`file::FileStorage`]: one JSON file per profile, written on every set.
//! - [`guest::GuestStorage`]: file storage, or memory when the data dir is
//!   not writable.

pub mod file;
pub mod guest;
pub mod memory;
