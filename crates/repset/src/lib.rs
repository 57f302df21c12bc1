//! # Repset
//!
//! The collaborative session core for shared workout rooms: several
//! independent clients create, join, and observe a capacity-bounded
//! ephemeral room identified by a 4-digit code, with termination delivered
//! through a hybrid push-plus-poll model.
//!
//! The layers, bottom up:
//!
//! - [`repset_types`] — identity newtypes, the [`Room`] document, the
//!   Open → Active → Ended state machine.
//! - [`repset_store`] — the [`RoomStore`] backend trait and the in-memory
//!   implementation ([`MemoryStore`]) with CAS updates and change feeds.
//! - [`repset_room`] — the [`RoomCoordinator`]: code generation, join
//!   validation, capacity enforcement, creator-only termination.
//! - [`repset_presence`] — [`PresenceChannel`] push subscriptions and the
//!   [`LivenessPoller`] termination backstop.
//!
//! [`SessionCore`] wires the layers over one shared store.
//!
//! ## Quick start
//!
//! ```rust
//! use repset::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let core = SessionCore::in_memory();
//!
//! let (code, room_id) = core
//!     .coordinator()
//!     .create_room(4, "Squats", UserId::new("creator"))
//!     .await?;
//!
//! let (alice, snapshot) = core.coordinator().join_room(&code, "Alice", 0).await?;
//! assert_eq!(snapshot.value.participants.len(), 1);
//!
//! let mut sub = core.presence().subscribe(room_id).await?;
//! let seen = sub.recv().await.expect("current snapshot");
//! assert_eq!(seen.value.participant(alice).unwrap().name, "Alice");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

pub use repset_presence::{
    LivenessPoller, PollConfig, PollHandle, PresenceChannel, Subscription,
};
pub use repset_room::{CoordinatorConfig, RoomCoordinator, RoomError};
pub use repset_store::{MemoryStore, RoomStore, StoreError, Version, Versioned};
pub use repset_types::{
    InvalidRoomCode, Participant, ParticipantId, Room, RoomCode, RoomId,
    RoomState, UserId,
};

/// One-stop imports for consumers.
pub mod prelude {
    pub use crate::{
        LivenessPoller, MemoryStore, Participant, ParticipantId,
        PresenceChannel, Room, RoomCode, RoomCoordinator, RoomError, RoomId,
        RoomState, RoomStore, SessionCore, UserId,
    };
}

/// The wired-up session subsystem: coordinator, presence channel, and
/// liveness poller sharing one store.
///
/// Components can also be assembled by hand when a deployment needs a
/// different store backend or polling cadence; this struct is just the
/// common wiring.
pub struct SessionCore<S> {
    coordinator: RoomCoordinator<S>,
    presence: PresenceChannel<S>,
    poller: LivenessPoller<S>,
}

impl SessionCore<MemoryStore> {
    /// Builds a core over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }
}

impl<S: RoomStore + 'static> SessionCore<S> {
    /// Wires all components over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            coordinator: RoomCoordinator::new(Arc::clone(&store)),
            presence: PresenceChannel::new(Arc::clone(&store)),
            poller: LivenessPoller::new(store),
        }
    }

    /// Wires all components with explicit configuration.
    pub fn with_config(
        store: Arc<S>,
        coordinator: CoordinatorConfig,
        poll: PollConfig,
    ) -> Self {
        Self {
            coordinator: RoomCoordinator::with_config(
                Arc::clone(&store),
                coordinator,
            ),
            presence: PresenceChannel::new(Arc::clone(&store)),
            poller: LivenessPoller::with_config(store, poll),
        }
    }

    pub fn coordinator(&self) -> &RoomCoordinator<S> {
        &self.coordinator
    }

    pub fn presence(&self) -> &PresenceChannel<S> {
        &self.presence
    }

    pub fn poller(&self) -> &LivenessPoller<S> {
        &self.poller
    }
}

impl<S> Clone for SessionCore<S> {
    fn clone(&self) -> Self {
        Self {
            coordinator: self.coordinator.clone(),
            presence: self.presence.clone(),
            poller: self.poller.clone(),
        }
    }
}
