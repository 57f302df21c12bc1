//! The storage trait and the versioning types that make optimistic
//! concurrency work.

use std::fmt;
use std::future::Future;

use repset_types::{Room, RoomCode, RoomId};
use tokio::sync::watch;

use crate::StoreError;

// ---------------------------------------------------------------------------
// Versioning
// ---------------------------------------------------------------------------

/// A per-document version number, starting at 1 and incremented on every
/// committed update. The compare-and-swap precondition for [`RoomStore::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(pub u64);

impl Version {
    /// The version every freshly created document starts at.
    pub const INITIAL: Version = Version(1);

    /// The version after one more committed update.
    pub fn next(self) -> Version {
        Version(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A document together with the version it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub version: Version,
    pub value: T,
}

impl<T> Versioned<T> {
    pub fn new(version: Version, value: T) -> Self {
        Self { version, value }
    }
}

// ---------------------------------------------------------------------------
// RoomStore
// ---------------------------------------------------------------------------

/// The document backend contract.
///
/// Methods return explicitly `Send` futures so callers can drive them from
/// spawned tasks regardless of which backend is plugged in.
///
/// # Consistency
///
/// `update` is a compare-and-swap: it commits only when the caller's
/// `expected` version still matches, so concurrent read-modify-write
/// cycles on the same room cannot silently drop each other's changes —
/// the loser observes [`StoreError::Conflict`], re-reads, and retries.
/// Commit and watcher notification are atomic: a watcher never observes
/// a version that was not committed.
pub trait RoomStore: Send + Sync {
    /// Persists a new room and returns its assigned id.
    ///
    /// Fails with [`StoreError::CodeTaken`] when another live (non-Ended)
    /// room holds the same code.
    fn create(
        &self,
        room: Room,
    ) -> impl Future<Output = Result<RoomId, StoreError>> + Send;

    /// Fetches a document (any state) by id.
    fn get(
        &self,
        id: RoomId,
    ) -> impl Future<Output = Result<Versioned<Room>, StoreError>> + Send;

    /// Resolves a code to the live room holding it.
    ///
    /// Ended rooms are skipped, so at most one room is ever relevant for
    /// a given code.
    fn find_by_code(
        &self,
        code: &RoomCode,
    ) -> impl Future<Output = Result<(RoomId, Versioned<Room>), StoreError>> + Send;

    /// Compare-and-swap update: commits `room` as the next version iff the
    /// document is still at `expected`, then notifies watchers.
    fn update(
        &self,
        id: RoomId,
        expected: Version,
        room: Room,
    ) -> impl Future<Output = Result<Versioned<Room>, StoreError>> + Send;

    /// Opens a change-notification feed for a room.
    ///
    /// The receiver always holds the latest committed snapshot; a slow
    /// reader observes coalesced updates, never a backlog.
    fn watch(
        &self,
        id: RoomId,
    ) -> impl Future<
        Output = Result<watch::Receiver<Versioned<Room>>, StoreError>,
    > + Send;
}
