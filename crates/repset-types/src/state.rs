//! Room lifecycle state machine.

use serde::{Deserialize, Serialize};

/// The lifecycle state of a room.
///
/// Transitions are strictly ordered — no skipping states:
///
/// ```text
/// Open → Active → Ended
/// ```
///
/// - **Open**: Room exists with an empty roster. Accepting joins.
/// - **Active**: At least one participant has joined. Still accepting
///   joins while under capacity.
/// - **Ended**: The creator closed the room. Terminal — nothing
///   resurrects a room; a later room reusing the same code is a brand
///   new document.
///
/// The state is stored on the room document and written transactionally
/// with every roster mutation, so clients never have to infer "ended"
/// from an empty participants list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomState {
    Open,
    Active,
    Ended,
}

impl RoomState {
    /// Returns `true` if the room is accepting new participants
    /// (capacity permitting).
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Open | Self::Active)
    }

    /// Returns `true` if the room has been closed by its creator.
    pub fn is_ended(&self) -> bool {
        matches!(self, Self::Ended)
    }

    /// Returns `true` if transitioning to `target` is valid.
    ///
    /// `Active → Active` is allowed (roster churn while running);
    /// `Ended` accepts no transitions.
    pub fn can_transition_to(self, target: Self) -> bool {
        match (self, target) {
            (Self::Open, Self::Active) => true,
            (Self::Active, Self::Active) => true,
            (Self::Open | Self::Active, Self::Ended) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::Active => write!(f, "Active"),
            Self::Ended => write!(f, "Ended"),
        }
    }
}
