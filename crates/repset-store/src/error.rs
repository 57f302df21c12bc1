//! Error types for the storage layer.

use repset_types::{RoomCode, RoomId};

use crate::Version;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No document exists under this id.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// No live room resolves from this code. Ended rooms do not count:
    /// their codes are invisible to lookup and may be reused.
    #[error("no live room with code {0}")]
    CodeNotFound(RoomCode),

    /// A compare-and-swap precondition was violated: the document moved
    /// since the caller read it. Callers re-read and retry.
    #[error("version conflict on room {id}: expected {expected}, found {actual}")]
    Conflict {
        id: RoomId,
        expected: Version,
        actual: Version,
    },

    /// Another live room already holds this code.
    #[error("room code {0} is already taken by a live room")]
    CodeTaken(RoomCode),

    /// The backend could not be reached. Transient; callers retry or
    /// surface it.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
