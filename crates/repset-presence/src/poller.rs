//! Pull-based termination backstop.

use std::sync::Arc;
use std::time::Duration;

use repset_store::{RoomStore, StoreError};
use repset_types::RoomCode;
use tokio::task::JoinHandle;

/// Polling cadence.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Time between liveness checks. Also the worst-case added latency
    /// for termination detection when the push path misses.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
        }
    }
}

/// Spawns per-client polling tasks that watch for room termination.
pub struct LivenessPoller<S> {
    store: Arc<S>,
    config: PollConfig,
}

impl<S> Clone for LivenessPoller<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: RoomStore + 'static> LivenessPoller<S> {
    /// Creates a poller with the default 5-second interval.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, PollConfig::default())
    }

    pub fn with_config(store: Arc<S>, config: PollConfig) -> Self {
        Self { store, config }
    }

    /// Starts polling a room by code.
    ///
    /// Every tick re-resolves the code. When it no longer resolves to a
    /// live room, `on_ended` fires exactly once and the task stops.
    /// Transient store failures are logged and retried on the next tick;
    /// they never terminate the subscription.
    pub fn start(
        &self,
        code: RoomCode,
        on_ended: impl FnOnce() + Send + 'static,
    ) -> PollHandle {
        let store = Arc::clone(&self.store);
        let interval = self.config.interval;

        let task = tokio::spawn(async move {
            let mut on_ended = Some(on_ended);
            loop {
                tokio::time::sleep(interval).await;
                match store.find_by_code(&code).await {
                    Ok((_, snap)) if snap.value.state.is_ended() => {
                        // Unreachable through stores whose lookup skips
                        // ended rooms, but other backends may hand one back.
                        tracing::info!(%code, "poll observed ended room");
                        if let Some(cb) = on_ended.take() {
                            cb();
                        }
                        break;
                    }
                    Ok(_) => {}
                    Err(StoreError::CodeNotFound(_)) => {
                        tracing::info!(%code, "poll found no live room, treating as ended");
                        if let Some(cb) = on_ended.take() {
                            cb();
                        }
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(%code, error = %e, "liveness poll failed, will retry");
                    }
                }
            }
        });

        PollHandle { task }
    }
}

/// Cancellation handle for a polling task.
///
/// Cancelling is idempotent, and dropping the handle cancels too, so a
/// poll loop can never outlive the component that started it.
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stops polling. No further ticks run and `on_ended` will not fire.
    /// Safe to call any number of times.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Returns `true` once the poll task has stopped, whether it fired
    /// or was cancelled.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
