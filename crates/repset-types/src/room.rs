//! The room aggregate: the document every layer reads and writes.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::{ParticipantId, RoomCode, RoomState, UserId};

/// A named occupant of a room with a running score.
///
/// The `id` is assigned at join time and is the only identity used for
/// lookups; `name` is display-only and may collide freely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub score: u32,
}

/// The room document — the aggregate root of the whole subsystem.
///
/// `code`, `capacity`, `activity`, `creator_id`, and `created_at` are
/// fixed at creation; only `participants` and `state` mutate. Participants
/// keep insertion order (join order).
///
/// This is also the snapshot type delivered to presence subscribers:
/// every delivery is a full replace-state document, never a diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub code: RoomCode,
    pub capacity: u32,
    pub activity: String,
    pub creator_id: UserId,
    pub participants: Vec<Participant>,
    pub created_at: SystemTime,
    pub state: RoomState,
}

impl Room {
    /// Builds a fresh room: empty roster, `Open`, created now.
    pub fn new(
        code: RoomCode,
        capacity: u32,
        activity: impl Into<String>,
        creator_id: UserId,
    ) -> Self {
        Self {
            code,
            capacity,
            activity: activity.into(),
            creator_id,
            participants: Vec::new(),
            created_at: SystemTime::now(),
            state: RoomState::Open,
        }
    }

    /// Returns `true` if the roster has reached capacity.
    pub fn is_full(&self) -> bool {
        self.participants.len() as u32 >= self.capacity
    }

    /// Returns `true` if `user` created this room.
    pub fn is_creator(&self, user: &UserId) -> bool {
        self.creator_id == *user
    }

    /// Looks up a participant by id.
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Looks up a participant by id, mutably.
    pub fn participant_mut(
        &mut self,
        id: ParticipantId,
    ) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }
}

// =========================================================================
// Tests
// =========================================================================
