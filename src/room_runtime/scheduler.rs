use crate::config::ServerConfig;
use crate::game::constants::FAULT_BACKOFF_MS;
use crate::lobby::Lobby;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};

/// Polls every room on a short interval and advances the running ones whose
/// tick period has elapsed. One room failing never stops the others.
pub async fn run_scheduler(lobby: Arc<Lobby>, config: ServerConfig) {
    let mut interval = tokio::time::interval(config.scan_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        let scan = tokio::spawn(scan_rooms(Arc::clone(&lobby), config.tick_period));
        match scan.await {
            Ok(0) => {}
            Ok(faults) => {
                tracing::warn!(faults, "rooms faulted during scan, backing off");
                tokio::time::sleep(Duration::from_millis(FAULT_BACKOFF_MS)).await;
            }
            Err(error) => {
                tracing::error!(%error, "scheduler scan panicked, backing off");
                tokio::time::sleep(Duration::from_millis(FAULT_BACKOFF_MS)).await;
            }
        }
    }
}

/// Returns how many rooms faulted.
async fn scan_rooms(lobby: Arc<Lobby>, tick_period: Duration) -> usize {
    let now = Instant::now();
    let mut faults = 0;
    for room in lobby.rooms() {
        if let Err(error) = room.advance(now, tick_period).await {
            tracing::warn!(room_id = room.id(), %error, "room tick failed");
            faults += 1;
        }
    }
    faults
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::RoomPhase;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn scheduler_advances_running_rooms() {
        let lobby = Arc::new(Lobby::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let session = lobby.connect(tx);
        let room_id = lobby.create_room(&session, "Ada").await.expect("room");
        lobby.start_game(&session).await.expect("start");

        let config = ServerConfig::default();
        tokio::spawn(run_scheduler(Arc::clone(&lobby), config));
        tokio::time::sleep(Duration::from_millis(5_000)).await;

        let room = lobby.room(&room_id).expect("room");
        assert_eq!(room.phase().await, RoomPhase::Running);

        let mut running_states = 0;
        while let Ok(payload) = rx.try_recv() {
            let value: serde_json::Value = serde_json::from_str(&payload).expect("json");
            if value["type"] == "game_state" && value["running"] == true {
                running_states += 1;
            }
        }
        // 1.5 s of running at 200 ms ticks, plus the go-live broadcast.
        assert!(running_states >= 5, "saw {running_states} running states");
    }

    #[tokio::test]
    async fn idle_rooms_are_left_alone() {
        let lobby = Arc::new(Lobby::new());
        let (tx, _rx) = mpsc::unbounded_channel();
        let session = lobby.connect(tx);
        lobby.create_room(&session, "Ada").await.expect("room");

        assert_eq!(scan_rooms(Arc::clone(&lobby), Duration::ZERO).await, 0);
    }
}
