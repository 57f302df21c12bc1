//! Error types for domain type construction.

/// A candidate room code that is not exactly four ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid room code {0:?}: expected exactly 4 ASCII digits")]
pub struct InvalidRoomCode(pub String);
