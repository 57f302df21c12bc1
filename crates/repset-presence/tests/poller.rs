//! Integration tests for the liveness poller.
//!
//! All timer tests run with `start_paused = true`: the runtime
//! auto-advances the clock whenever every task is parked on a timer, so
//! poll intervals resolve deterministically and instantly.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use repset_presence::{LivenessPoller, PollConfig};
use repset_store::{MemoryStore, RoomStore, StoreError, Version, Versioned};
use repset_types::{Room, RoomCode, RoomId, RoomState, UserId};
use tokio::sync::watch;

fn code(s: &str) -> RoomCode {
    RoomCode::parse(s).unwrap()
}

fn room(c: &str) -> Room {
    Room::new(code(c), 4, "Squats", UserId::new("u1"))
}

fn poller(store: &Arc<MemoryStore>) -> LivenessPoller<MemoryStore> {
    LivenessPoller::with_config(
        Arc::clone(store),
        PollConfig {
            interval: Duration::from_secs(5),
        },
    )
}

#[tokio::test(start_paused = true)]
async fn test_fires_when_code_never_resolves() {
    let store = Arc::new(MemoryStore::new());
    let (tx, rx) = tokio::sync::oneshot::channel();

    let handle = poller(&store).start(code("9999"), move || {
        tx.send(()).unwrap();
    });

    tokio::time::timeout(Duration::from_secs(6), rx)
        .await
        .expect("poller should fire within one interval")
        .unwrap();
    tokio::task::yield_now().await;
    assert!(handle.is_finished());
}

#[tokio::test(start_paused = true)]
async fn test_fires_after_creator_ends_room() {
    let store = Arc::new(MemoryStore::new());
    let id = store.create(room("1234")).await.unwrap();

    let (tx, rx) = tokio::sync::oneshot::channel();
    let _handle = poller(&store).start(code("1234"), move || {
        tx.send(()).unwrap();
    });

    // Let a couple of live ticks pass first.
    tokio::time::sleep(Duration::from_secs(12)).await;

    let read = store.get(id).await.unwrap();
    let mut doc = read.value;
    doc.participants.clear();
    doc.state = RoomState::Ended;
    store.update(id, read.version, doc).await.unwrap();

    // Within one more interval the poll must notice.
    tokio::time::timeout(Duration::from_secs(6), rx)
        .await
        .expect("poller should observe the ended room")
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_does_not_fire_on_live_room() {
    let store = Arc::new(MemoryStore::new());
    store.create(room("1234")).await.unwrap();

    let fired = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&fired);
    let handle = poller(&store).start(code("1234"), move || {
        flag.store(true, Ordering::SeqCst);
    });

    // Many intervals of a healthy room: nothing must fire.
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(!fired.load(Ordering::SeqCst));
    assert!(!handle.is_finished());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_is_idempotent_and_suppresses_callback() {
    let store = Arc::new(MemoryStore::new());

    let fired = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&fired);
    // Unknown code: would fire on the first tick if left running.
    let handle = poller(&store).start(code("9999"), move || {
        flag.store(true, Ordering::SeqCst);
    });

    handle.cancel();
    handle.cancel();

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(!fired.load(Ordering::SeqCst));
    assert!(handle.is_finished());
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_polling() {
    let store = Arc::new(MemoryStore::new());

    let fired = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&fired);
    let handle = poller(&store).start(code("9999"), move || {
        flag.store(true, Ordering::SeqCst);
    });
    drop(handle);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(!fired.load(Ordering::SeqCst));
}

// =========================================================================
// Transient failure tolerance
// =========================================================================

/// A store whose lookups fail a fixed number of times before settling on
/// "no such room". Only `find_by_code` is exercised by the poller.
struct FlakyStore {
    failures_left: AtomicU32,
    lookups: AtomicU32,
}

impl FlakyStore {
    fn new(failures: u32) -> Self {
        Self {
            failures_left: AtomicU32::new(failures),
            lookups: AtomicU32::new(0),
        }
    }
}

impl RoomStore for FlakyStore {
    fn create(
        &self,
        _room: Room,
    ) -> impl Future<Output = Result<RoomId, StoreError>> + Send {
        async { Err(StoreError::Unavailable("flaky".into())) }
    }

    fn get(
        &self,
        id: RoomId,
    ) -> impl Future<Output = Result<Versioned<Room>, StoreError>> + Send {
        async move { Err(StoreError::NotFound(id)) }
    }

    async fn find_by_code(
        &self,
        code: &RoomCode,
    ) -> Result<(RoomId, Versioned<Room>), StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            Err(StoreError::Unavailable("backend unreachable".into()))
        } else {
            Err(StoreError::CodeNotFound(code.clone()))
        }
    }

    fn update(
        &self,
        _id: RoomId,
        _expected: Version,
        _room: Room,
    ) -> impl Future<Output = Result<Versioned<Room>, StoreError>> + Send {
        async { Err(StoreError::Unavailable("flaky".into())) }
    }

    fn watch(
        &self,
        id: RoomId,
    ) -> impl Future<
        Output = Result<watch::Receiver<Versioned<Room>>, StoreError>,
    > + Send {
        async move { Err(StoreError::NotFound(id)) }
    }
}

#[tokio::test(start_paused = true)]
async fn test_transient_lookup_errors_are_retried_not_fatal() {
    let store = Arc::new(FlakyStore::new(2));
    let poller = LivenessPoller::with_config(
        Arc::clone(&store),
        PollConfig {
            interval: Duration::from_secs(5),
        },
    );

    let (tx, rx) = tokio::sync::oneshot::channel();
    let _handle = poller.start(code("9999"), move || {
        tx.send(()).unwrap();
    });

    // Two failed ticks, then the third resolves and fires.
    tokio::time::timeout(Duration::from_secs(16), rx)
        .await
        .expect("poller should survive transient failures and fire")
        .unwrap();
    assert_eq!(store.lookups.load(Ordering::SeqCst), 3);
}
