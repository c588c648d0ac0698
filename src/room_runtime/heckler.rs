use crate::game::constants::{MEAN_COMMENT_BACKOFF_SECS, MEAN_COMMENT_MAX_SECS, MEAN_COMMENT_MIN_SECS};
use crate::lobby::Lobby;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Every few seconds, pokes one dead participant per running room with a
/// cosmetic message. Never touches simulation state.
pub async fn run_heckler(lobby: Arc<Lobby>) {
    loop {
        let pass = tokio::spawn(heckle_rooms(Arc::clone(&lobby)));
        if let Err(error) = pass.await {
            tracing::warn!(%error, "heckler pass failed, backing off");
            tokio::time::sleep(Duration::from_secs(MEAN_COMMENT_BACKOFF_SECS)).await;
            continue;
        }
        let delay = rand::thread_rng().gen_range(MEAN_COMMENT_MIN_SECS..MEAN_COMMENT_MAX_SECS);
        tokio::time::sleep(Duration::from_secs_f64(delay)).await;
    }
}

async fn heckle_rooms(lobby: Arc<Lobby>) -> usize {
    let mut sent = 0;
    for room in lobby.rooms() {
        if room.heckle().await {
            sent += 1;
        }
    }
    sent
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn forming_rooms_are_not_heckled() {
        let lobby = Arc::new(Lobby::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let session = lobby.connect(tx);
        lobby.create_room(&session, "Ada").await.expect("room");
        while rx.try_recv().is_ok() {}

        assert_eq!(heckle_rooms(Arc::clone(&lobby)).await, 0);
        assert!(rx.try_recv().is_err());
    }
}
