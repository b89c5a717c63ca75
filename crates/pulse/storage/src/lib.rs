//! Snapshot-store abstraction for the PULSE metrics engine.
//!
//! The engine persists computed aggregates through this contract:
//! a namespaced key-value store with per-entry TTL. The production
//! collaborator lives elsewhere in the platform; this crate defines the
//! trait boundary and ships a deterministic in-memory adapter for
//! development and testing.
//!
//! Design stance:
//! - the store is fallible and latent by contract; callers never assume
//!   in-memory speed from it
//! - expiry is the store's concern, not the engine's

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod error;
pub mod memory;
mod traits;

pub use error::{StorageError, StorageResult};
pub use memory::InMemorySnapshotStore;
pub use traits::SnapshotStore;
