//! Error types for the coordination layer.

use repset_store::StoreError;
use repset_types::{ParticipantId, RoomCode, UserId};

/// Errors that can occur during coordinator operations.
///
/// Callers (UI, navigation) branch on these to decide user-facing
/// messaging; a full room and a nonexistent room must stay
/// distinguishable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RoomError {
    /// The code does not resolve to a live room.
    #[error("no live room with code {0}")]
    RoomNotFound(RoomCode),

    /// The roster is at capacity.
    #[error("room {0} is full")]
    RoomFull(RoomCode),

    /// A non-creator attempted end/exit.
    #[error("user {0} is not the creator of this room")]
    Unauthorized(UserId),

    /// Code generation exhausted its retry budget without finding a
    /// free code.
    #[error("could not generate an unused room code after {attempts} attempts")]
    CodeCollision { attempts: u32 },

    /// A score update referenced a participant who is not in the room.
    #[error("participant {0} is not in this room")]
    ParticipantNotFound(ParticipantId),

    /// Room capacity must be a positive integer.
    #[error("invalid room capacity {0}: must be at least 1")]
    InvalidCapacity(u32),

    /// The storage layer failed (including CAS retry exhaustion under
    /// sustained contention).
    #[error(transparent)]
    Store(#[from] StoreError),
}
