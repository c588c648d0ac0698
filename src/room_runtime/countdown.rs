use crate::game::constants::{COUNTDOWN_FROM, COUNTDOWN_STEP_MS, GO_DELAY_MS};
use crate::lobby::Lobby;
use std::sync::Arc;
use std::time::Duration;

/// Runs the 3, 2, 1, go sequence for `round` of a room. The room is looked up
/// by id before every step and no lock is held while sleeping, so a room that
/// disappears or restarts mid-sequence simply ends it. A panicking sequence is
/// caught here and the room is put back into a startable phase.
pub fn spawn_countdown(lobby: Arc<Lobby>, room_id: String, round: u64) {
    tokio::spawn(async move {
        let sequence = tokio::spawn(run_countdown(Arc::clone(&lobby), room_id.clone(), round));
        if let Err(error) = sequence.await {
            tracing::error!(room_id = %room_id, round, %error, "countdown sequence failed");
            if let Some(room) = lobby.room(&room_id) {
                room.abort_countdown(round).await;
            }
        }
    });
}

async fn run_countdown(lobby: Arc<Lobby>, room_id: String, round: u64) {
    for count in (1..=COUNTDOWN_FROM).rev() {
        if !announce(&lobby, &room_id, round, count).await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(COUNTDOWN_STEP_MS)).await;
    }

    if !announce(&lobby, &room_id, round, 0).await {
        return;
    }
    tokio::time::sleep(Duration::from_millis(GO_DELAY_MS)).await;

    let Some(room) = lobby.room(&room_id) else { return };
    if !room.go_live(round).await {
        tracing::debug!(room_id = %room_id, round, "countdown superseded before going live");
    }
}

async fn announce(lobby: &Lobby, room_id: &str, round: u64, count: u32) -> bool {
    let Some(room) = lobby.room(room_id) else {
        tracing::debug!(room_id, round, "room gone during countdown");
        return false;
    };
    room.announce_countdown(round, count).await
}
