//! Room coordination rules for Repset.
//!
//! The [`RoomCoordinator`] owns every business rule of the session
//! subsystem: room-code generation with bounded collision retry, join
//! validation and capacity enforcement, creator-only termination, and
//! score updates. It is the only writer of room documents — all mutation
//! goes through read-validate-CAS cycles against a [`repset_store::RoomStore`],
//! which is what serializes concurrent writers per room.
//!
//! # Key types
//!
//! - [`RoomCoordinator`] — the operations
//! - [`CoordinatorConfig`] — retry budgets
//! - [`RoomError`] — the failure taxonomy callers branch on

mod config;
mod coordinator;
mod error;

pub use config::CoordinatorConfig;
pub use coordinator::RoomCoordinator;
pub use error::RoomError;
