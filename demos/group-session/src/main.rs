//! Simulated group workout session.
//!
//! Walks the whole core through the flow the mobile app drives: a creator
//! opens a squats room, three friends join by code, their exercise
//! counters push score updates, and the creator ends the session. Every
//! client watches the room through both the push channel and the polling
//! backstop.
//!
//! Run with `RUST_LOG=info cargo run -p group-session` to watch the
//! lifecycle logs.

use std::time::Duration;

use repset::PollHandle;
use repset::prelude::*;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let core = SessionCore::in_memory();
    let creator = UserId::new("creator-device");

    let (code, room_id) = core
        .coordinator()
        .create_room(4, "Squats", creator.clone())
        .await?;
    info!(%code, %room_id, "room is open, share the code");

    // Three friends punch in the code on their phones.
    let mut clients = Vec::new();
    for name in ["Alice", "Bob", "Cara"] {
        let (participant, snapshot) =
            core.coordinator().join_room(&code, name, 0).await?;
        info!(
            %participant,
            name,
            roster = snapshot.value.participants.len(),
            "joined the room"
        );
        clients.push((name, participant));
    }

    // Each client follows the roster over the push channel.
    let mut watchers = tokio::task::JoinSet::new();
    for (name, _) in &clients {
        let name = *name;
        let mut sub = core.presence().subscribe(room_id).await?;
        watchers.spawn(async move {
            while let Some(snap) = sub.recv().await {
                let scores: Vec<String> = snap
                    .value
                    .participants
                    .iter()
                    .map(|p| format!("{}={}", p.name, p.score))
                    .collect();
                info!(client = name, state = %snap.value.state, ?scores, "roster update");
                if snap.value.state.is_ended() {
                    info!(client = name, "room ended, leaving");
                    break;
                }
            }
        });
    }

    // And each client arms the liveness backstop.
    let poll_handles: Vec<PollHandle> = clients
        .iter()
        .map(|(name, _)| {
            let name = *name;
            core.poller().start(code.clone(), move || {
                info!(client = name, "poll backstop noticed the room ended");
            })
        })
        .collect();

    // The external exercise counters report reps for a while.
    for round in 1..=3u32 {
        tokio::time::sleep(Duration::from_millis(300)).await;
        for (i, (_, participant)) in clients.iter().enumerate() {
            core.coordinator()
                .update_score(&code, *participant, round * (i as u32 + 5))
                .await?;
        }
    }

    tokio::time::sleep(Duration::from_millis(300)).await;
    info!("creator is wrapping up");
    core.coordinator().end_room(room_id, &creator).await?;

    while watchers.join_next().await.is_some() {}
    for handle in &poll_handles {
        handle.cancel();
    }
    info!("session over");
    Ok(())
}
