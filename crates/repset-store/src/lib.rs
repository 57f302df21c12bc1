//! Room document storage for Repset.
//!
//! This crate is the only layer that touches persistent state. It exposes:
//!
//! - [`RoomStore`] — the backend trait: per-document reads, optimistic
//!   compare-and-swap updates, and a change-notification feed per room.
//! - [`MemoryStore`] — the in-process implementation backing tests and
//!   single-node deployments.
//! - [`StoreError`] — what can go wrong at the storage layer.
//!
//! Any backend offering per-document read/update plus change notification
//! can implement [`RoomStore`]; business rules (capacity, authorization,
//! code generation) live one layer up in `repset-room` and reach the store
//! only through this trait.

mod error;
mod memory;
mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use store::{RoomStore, Version, Versioned};
