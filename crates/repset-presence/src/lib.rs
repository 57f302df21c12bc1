//! Room-state delivery for Repset clients: push first, poll as backstop.
//!
//! Two independent paths tell a client what its room looks like:
//!
//! - [`PresenceChannel`] — push. Wraps the store's change feed; every
//!   roster mutation is delivered to every subscriber as a full
//!   replace-state snapshot, with intermediate states coalesced.
//! - [`LivenessPoller`] — pull. A per-client timer that re-resolves the
//!   room by code on a fixed interval and fires a one-shot callback when
//!   the room has ended. It exists because push transports can drop
//!   messages and clients can attach after the terminating mutation;
//!   polling bounds worst-case termination-detection latency to one
//!   interval.
//!
//! Both hand out handles whose cancellation is idempotent and which tear
//! themselves down on drop.

mod channel;
mod poller;

pub use channel::{PresenceChannel, Subscription};
pub use poller::{LivenessPoller, PollConfig, PollHandle};
