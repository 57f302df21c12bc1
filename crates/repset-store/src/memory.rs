//! In-memory store: the reference backend.
//!
//! A single `RwLock`-guarded map of room documents, each entry carrying a
//! `watch` channel for change notification. Good for tests and single-node
//! deployments; a managed document database would implement the same trait
//! for anything bigger.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use repset_types::{Room, RoomCode, RoomId};
use tokio::sync::{RwLock, watch};

use crate::{RoomStore, StoreError, Version, Versioned};

struct Entry {
    current: Versioned<Room>,
    /// Change feed; always holds `current`. Kept alive here so late
    /// subscribers can attach after the last receiver went away.
    notify: watch::Sender<Versioned<Room>>,
}

/// An in-process [`RoomStore`].
///
/// Ended rooms stay in the map as inert documents (nothing ever deletes a
/// room), but they drop out of code lookup, which is what frees their code
/// for reuse.
pub struct MemoryStore {
    rooms: RwLock<HashMap<RoomId, Entry>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of documents held, ended rooms included.
    pub async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Returns `true` if the store holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.rooms.read().await.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomStore for MemoryStore {
    async fn create(&self, room: Room) -> Result<RoomId, StoreError> {
        let mut rooms = self.rooms.write().await;

        // Code uniqueness is only enforced among live rooms.
        let taken = rooms.values().any(|entry| {
            entry.current.value.code == room.code
                && !entry.current.value.state.is_ended()
        });
        if taken {
            return Err(StoreError::CodeTaken(room.code));
        }

        let id = RoomId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let current = Versioned::new(Version::INITIAL, room);
        let (notify, _) = watch::channel(current.clone());
        tracing::info!(room_id = %id, code = %current.value.code, "room document created");
        rooms.insert(id, Entry { current, notify });
        Ok(id)
    }

    async fn get(&self, id: RoomId) -> Result<Versioned<Room>, StoreError> {
        let rooms = self.rooms.read().await;
        rooms
            .get(&id)
            .map(|entry| entry.current.clone())
            .ok_or(StoreError::NotFound(id))
    }

    async fn find_by_code(
        &self,
        code: &RoomCode,
    ) -> Result<(RoomId, Versioned<Room>), StoreError> {
        let rooms = self.rooms.read().await;
        rooms
            .iter()
            .find(|(_, entry)| {
                entry.current.value.code == *code
                    && !entry.current.value.state.is_ended()
            })
            .map(|(id, entry)| (*id, entry.current.clone()))
            .ok_or_else(|| StoreError::CodeNotFound(code.clone()))
    }

    async fn update(
        &self,
        id: RoomId,
        expected: Version,
        room: Room,
    ) -> Result<Versioned<Room>, StoreError> {
        let mut rooms = self.rooms.write().await;
        let entry = rooms.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if entry.current.version != expected {
            return Err(StoreError::Conflict {
                id,
                expected,
                actual: entry.current.version,
            });
        }

        entry.current = Versioned::new(expected.next(), room);
        // Commit and notification happen under the same write lock, so
        // watchers never see an uncommitted version.
        entry.notify.send_replace(entry.current.clone());
        tracing::debug!(
            room_id = %id,
            version = %entry.current.version,
            participants = entry.current.value.participants.len(),
            "room document updated"
        );
        Ok(entry.current.clone())
    }

    async fn watch(
        &self,
        id: RoomId,
    ) -> Result<watch::Receiver<Versioned<Room>>, StoreError> {
        let rooms = self.rooms.read().await;
        rooms
            .get(&id)
            .map(|entry| entry.notify.subscribe())
            .ok_or(StoreError::NotFound(id))
    }
}
