//! Shared domain types for Repset workout rooms.
//!
//! Everything that crosses a layer boundary lives here:
//!
//! - Identity newtypes ([`UserId`], [`RoomId`], [`RoomCode`], [`ParticipantId`])
//! - The room document ([`Room`], [`Participant`])
//! - The lifecycle state machine ([`RoomState`])
//!
//! These types are also the JSON boundary format: the serde field names are
//! a contract with whatever document backend and UI consume them, and the
//! tests pin the exact shapes.

mod error;
mod ids;
mod room;
mod state;

pub use error::InvalidRoomCode;
pub use ids::{ParticipantId, RoomCode, RoomId, UserId};
pub use room::{Participant, Room};
pub use state::RoomState;
