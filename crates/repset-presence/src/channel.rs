//! Push-based room snapshot delivery.

use std::sync::Arc;

use repset_store::{RoomStore, StoreError, Versioned};
use repset_types::{Room, RoomId};
use tokio::sync::watch;

/// Multiplexes "this room changed" events to subscribers without blocking
/// the mutation path: delivery rides on the store's `watch` feed, so a
/// writer never waits for a slow reader.
pub struct PresenceChannel<S> {
    store: Arc<S>,
}

impl<S> Clone for PresenceChannel<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: RoomStore> PresenceChannel<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Subscribes to a room's snapshot stream.
    ///
    /// The first `recv` yields the current snapshot immediately, so a
    /// subscriber that attaches after a mutation (including the
    /// terminating one) still observes it.
    pub async fn subscribe(
        &self,
        room_id: RoomId,
    ) -> Result<Subscription<S>, StoreError> {
        let mut rx = self.store.watch(room_id).await?;
        rx.mark_changed();
        tracing::debug!(%room_id, "presence subscription opened");
        Ok(Subscription {
            room_id,
            store: Arc::clone(&self.store),
            rx: Some(rx),
        })
    }
}

/// A live subscription to one room's snapshots.
///
/// Each delivered snapshot is authoritative replace-state: consumers swap
/// their view wholesale rather than applying diffs. A subscriber that lags
/// behind several mutations wakes once with the latest state.
pub struct Subscription<S> {
    room_id: RoomId,
    store: Arc<S>,
    /// `None` once cancelled.
    rx: Option<watch::Receiver<Versioned<Room>>>,
}

impl<S> std::fmt::Debug for Subscription<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("room_id", &self.room_id)
            .field("cancelled", &self.rx.is_none())
            .finish_non_exhaustive()
    }
}

impl<S: RoomStore> Subscription<S> {
    /// The room this subscription follows.
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Waits for the next snapshot.
    ///
    /// Returns `None` after [`cancel`](Self::cancel), or once the feed is
    /// gone and one automatic resubscription attempt has also failed.
    pub async fn recv(&mut self) -> Option<Versioned<Room>> {
        loop {
            let rx = self.rx.as_mut()?;
            match rx.changed().await {
                Ok(()) => return Some(rx.borrow_and_update().clone()),
                Err(_) => {
                    // Feed lapsed (backend dropped the channel). Try to
                    // reattach once through the store.
                    tracing::warn!(
                        room_id = %self.room_id,
                        "presence feed lapsed, resubscribing"
                    );
                    match self.store.watch(self.room_id).await {
                        Ok(mut fresh) => {
                            fresh.mark_changed();
                            self.rx = Some(fresh);
                        }
                        Err(e) => {
                            tracing::warn!(
                                room_id = %self.room_id,
                                error = %e,
                                "presence resubscription failed, closing"
                            );
                            self.rx = None;
                            return None;
                        }
                    }
                }
            }
        }
    }

    /// Stops delivery. Safe to call any number of times; dropping the
    /// subscription has the same effect.
    pub fn cancel(&mut self) {
        if self.rx.take().is_some() {
            tracing::debug!(room_id = %self.room_id, "presence subscription cancelled");
        }
    }

    /// Returns `true` if [`cancel`](Self::cancel) was called (or delivery
    /// already closed itself).
    pub fn is_cancelled(&self) -> bool {
        self.rx.is_none()
    }
}
