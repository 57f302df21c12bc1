//! The room coordinator: every business rule in one place.
//!
//! All mutations follow the same shape: read the current document, validate
//! against it, write the mutated document back with a compare-and-swap, and
//! on conflict re-read and re-validate. Validation happens against the
//! version the CAS commits over, so a capacity check can never be defeated
//! by a concurrent join — the check is part of the critical section, not a
//! pre-check.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use repset_store::{RoomStore, StoreError, Versioned};
use repset_types::{Participant, ParticipantId, Room, RoomCode, RoomId, RoomState, UserId};

use crate::{CoordinatorConfig, RoomError};

/// Counter for assigning participant identities at join time.
static NEXT_PARTICIPANT_ID: AtomicU64 = AtomicU64::new(1);

/// Coordinates room creation, joins, score updates, and termination
/// against a shared [`RoomStore`].
///
/// Cheap to clone via the shared store handle; arbitrarily many clients
/// may call into the same coordinator (or separate coordinators over the
/// same store) concurrently.
pub struct RoomCoordinator<S> {
    store: Arc<S>,
    config: CoordinatorConfig,
}

impl<S> Clone for RoomCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: RoomStore> RoomCoordinator<S> {
    /// Creates a coordinator with default retry budgets.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, CoordinatorConfig::default())
    }

    pub fn with_config(store: Arc<S>, config: CoordinatorConfig) -> Self {
        Self { store, config }
    }

    /// The underlying store handle, for wiring up presence and polling.
    pub fn store(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    /// Creates a room: generates a 4-digit code, persists an empty `Open`
    /// roster, and returns `(code, id)`.
    ///
    /// Generation retries on collision with a live room, bounded by
    /// `config.code_attempts`; exhaustion surfaces as
    /// [`RoomError::CodeCollision`] rather than silently shadowing an
    /// existing room.
    pub async fn create_room(
        &self,
        capacity: u32,
        activity: impl Into<String>,
        creator: UserId,
    ) -> Result<(RoomCode, RoomId), RoomError> {
        if capacity == 0 {
            return Err(RoomError::InvalidCapacity(capacity));
        }
        let activity = activity.into();

        for _ in 0..self.config.code_attempts {
            let code = generate_code();
            let room =
                Room::new(code.clone(), capacity, activity.clone(), creator.clone());

            match self.store.create(room).await {
                Ok(id) => {
                    tracing::info!(
                        room_id = %id,
                        %code,
                        capacity,
                        activity = %activity,
                        creator = %creator,
                        "room created"
                    );
                    return Ok((code, id));
                }
                Err(StoreError::CodeTaken(code)) => {
                    tracing::warn!(%code, "room code collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(RoomError::CodeCollision {
            attempts: self.config.code_attempts,
        })
    }

    /// Joins a live room by code.
    ///
    /// Fails with [`RoomError::RoomNotFound`] when the code does not
    /// resolve (unknown, or the room has ended) and [`RoomError::RoomFull`]
    /// at capacity. On success the participant is appended in join order
    /// under a fresh [`ParticipantId`], the room transitions `Open → Active`
    /// if this was the first join, and the committed snapshot is returned.
    pub async fn join_room(
        &self,
        code: &RoomCode,
        display_name: impl Into<String>,
        initial_score: u32,
    ) -> Result<(ParticipantId, Versioned<Room>), RoomError> {
        let display_name = display_name.into();

        let mut attempt = 0;
        loop {
            let (id, read) = self.resolve(code).await?;
            let mut room = read.value;

            if room.is_full() {
                return Err(RoomError::RoomFull(code.clone()));
            }

            let participant_id =
                ParticipantId(NEXT_PARTICIPANT_ID.fetch_add(1, Ordering::Relaxed));
            room.participants.push(Participant {
                id: participant_id,
                name: display_name.clone(),
                score: initial_score,
            });
            if room.state == RoomState::Open {
                room.state = RoomState::Active;
            }

            match self.store.update(id, read.version, room).await {
                Ok(committed) => {
                    tracing::info!(
                        room_id = %id,
                        %code,
                        %participant_id,
                        name = %display_name,
                        participants = committed.value.participants.len(),
                        "participant joined"
                    );
                    return Ok((participant_id, committed));
                }
                Err(StoreError::Conflict { .. })
                    if attempt + 1 < self.config.cas_retries =>
                {
                    attempt += 1;
                    tracing::debug!(%code, attempt, "join lost CAS race, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Sets a participant's score. Idempotent: re-applying the same score
    /// commits nothing and wakes no watchers.
    ///
    /// No range or monotonicity validation is applied — scores are
    /// whatever the exercise counter reports.
    pub async fn update_score(
        &self,
        code: &RoomCode,
        participant: ParticipantId,
        score: u32,
    ) -> Result<Versioned<Room>, RoomError> {
        let mut attempt = 0;
        loop {
            let (id, read) = self.resolve(code).await?;
            let mut room = read.value;

            let entry = room
                .participant_mut(participant)
                .ok_or(RoomError::ParticipantNotFound(participant))?;
            if entry.score == score {
                return Ok(Versioned::new(read.version, room));
            }
            entry.score = score;

            match self.store.update(id, read.version, room).await {
                Ok(committed) => {
                    tracing::debug!(
                        room_id = %id,
                        %participant,
                        score,
                        "score updated"
                    );
                    return Ok(committed);
                }
                Err(StoreError::Conflict { .. })
                    if attempt + 1 < self.config.cas_retries =>
                {
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Ends a room: clears the roster and marks it `Ended`. Creator only.
    ///
    /// Idempotent — ending an already-ended room is a successful no-op.
    /// Every subscriber and poller observes the terminal snapshot.
    pub async fn end_room(
        &self,
        id: RoomId,
        caller: &UserId,
    ) -> Result<Versioned<Room>, RoomError> {
        self.close(id, caller, "ended").await
    }

    /// Exits and closes a room as its creator. Observably identical to
    /// [`end_room`](Self::end_room); only the logged reason differs.
    pub async fn exit_room(
        &self,
        id: RoomId,
        caller: &UserId,
    ) -> Result<Versioned<Room>, RoomError> {
        self.close(id, caller, "exited").await
    }

    /// Read-only fetch of a live room by code.
    pub async fn snapshot(
        &self,
        code: &RoomCode,
    ) -> Result<Versioned<Room>, RoomError> {
        let (_, read) = self.resolve(code).await?;
        Ok(read)
    }

    async fn close(
        &self,
        id: RoomId,
        caller: &UserId,
        reason: &str,
    ) -> Result<Versioned<Room>, RoomError> {
        let mut attempt = 0;
        loop {
            let read = self.store.get(id).await?;

            // Authorization first: a non-creator is rejected before any
            // state is touched, even on an already-ended room.
            if !read.value.is_creator(caller) {
                return Err(RoomError::Unauthorized(caller.clone()));
            }
            if read.value.state.is_ended() {
                return Ok(read);
            }

            let mut room = read.value;
            room.participants.clear();
            room.state = RoomState::Ended;

            match self.store.update(id, read.version, room).await {
                Ok(committed) => {
                    tracing::info!(room_id = %id, creator = %caller, "room {reason} by creator");
                    return Ok(committed);
                }
                Err(StoreError::Conflict { .. })
                    if attempt + 1 < self.config.cas_retries =>
                {
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn resolve(
        &self,
        code: &RoomCode,
    ) -> Result<(RoomId, Versioned<Room>), RoomError> {
        match self.store.find_by_code(code).await {
            Ok(found) => Ok(found),
            Err(StoreError::CodeNotFound(code)) => {
                Err(RoomError::RoomNotFound(code))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Draws a uniform random code in `[1000, 9999]`.
fn generate_code() -> RoomCode {
    let n: u32 = rand::rng().random_range(1000..=9999);
    RoomCode::from_number(n).expect("generator stays in [1000, 9999]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_codes_are_four_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.as_str().len(), 4);
            assert!(code.as_str().bytes().all(|b| b.is_ascii_digit()));
            assert!(code.as_str().parse::<u32>().unwrap() >= 1000);
        }
    }

    #[test]
    fn test_participant_ids_are_unique() {
        let a = ParticipantId(NEXT_PARTICIPANT_ID.fetch_add(1, Ordering::Relaxed));
        let b = ParticipantId(NEXT_PARTICIPANT_ID.fetch_add(1, Ordering::Relaxed));
        assert_ne!(a, b);
    }
}
