//! Identity newtypes.
//!
//! Each identifier wraps a primitive so a `RoomId` can never be passed where
//! a `ParticipantId` is expected. All of them serialize transparently as the
//! inner value, so a `RoomId(7)` is just `7` in JSON and a `UserId` is a
//! plain string.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::InvalidRoomCode;

// ---------------------------------------------------------------------------
// UserId
// ---------------------------------------------------------------------------

/// An opaque, stable user identity supplied by the external identity
/// provider. The core never inspects it beyond equality checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Convenience constructor from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

// ---------------------------------------------------------------------------
// RoomId
// ---------------------------------------------------------------------------

/// A store-assigned document identifier for a room.
///
/// Distinct from [`RoomCode`]: the id is unique for the lifetime of the
/// store, while a code is a short human-typed lookup key that may be reused
/// once the room that held it has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// RoomCode
// ---------------------------------------------------------------------------

/// The short human-typed room identifier: exactly 4 ASCII digits.
///
/// Codes are generated uniformly in `[1000, 9999]` and are only
/// best-effort unique; the coordinator retries generation on collision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Validates and wraps a candidate code.
    pub fn parse(code: &str) -> Result<Self, InvalidRoomCode> {
        if code.len() == 4 && code.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(code.to_owned()))
        } else {
            Err(InvalidRoomCode(code.to_owned()))
        }
    }

    /// Builds a code from a number in `[1000, 9999]`.
    ///
    /// Callers (the coordinator's generator) are expected to stay in range;
    /// out-of-range values are rejected the same way `parse` rejects them.
    pub fn from_number(n: u32) -> Result<Self, InvalidRoomCode> {
        Self::parse(&n.to_string())
    }

    /// The code as its four digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RoomCode {
    type Err = InvalidRoomCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// ParticipantId
// ---------------------------------------------------------------------------

/// A stable per-join participant identity, assigned by the coordinator.
///
/// Display names are not identities: two people named "Alex" in the same
/// room stay distinguishable, and score updates target a participant id
/// rather than a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

// =========================================================================
// Tests
// =========================================================================
