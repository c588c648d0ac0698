use crate::error::{GameError, Result};
use crate::game::room::Room;
use crate::game::types::Direction;
use crate::protocol::{self, ClientMessage, ServerMessage};
use crate::room_runtime::countdown::spawn_countdown;
use crate::shared::names::sanitize_player_name;
use crate::shared::room_code::{generate_room_code, sanitize_room_code};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// Room registry plus the session directory. Map guards are never held
/// across an `.await`; each room serializes its own mutations.
#[derive(Debug, Default)]
pub struct Lobby {
    rooms: DashMap<String, Arc<Room>>,
    sessions: DashMap<String, SessionEntry>,
}

#[derive(Debug)]
struct SessionEntry {
    outbox: UnboundedSender<String>,
    room_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LobbyStats {
    pub rooms: usize,
    pub sessions: usize,
}

impl Lobby {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&self, outbox: UnboundedSender<String>) -> String {
        let session_id = Uuid::new_v4().to_string();
        self.sessions.insert(
            session_id.clone(),
            SessionEntry {
                outbox,
                room_id: None,
            },
        );
        tracing::debug!(session_id = %session_id, "session connected");
        session_id
    }

    pub async fn disconnect(&self, session_id: &str) {
        self.leave_current_room(session_id).await;
        self.sessions.remove(session_id);
        tracing::debug!(session_id, "session disconnected");
    }

    pub fn room(&self, room_id: &str) -> Option<Arc<Room>> {
        self.rooms.get(room_id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn rooms(&self) -> Vec<Arc<Room>> {
        self.rooms
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    pub fn session_room_id(&self, session_id: &str) -> Option<String> {
        self.sessions
            .get(session_id)
            .and_then(|entry| entry.room_id.clone())
    }

    pub fn stats(&self) -> LobbyStats {
        LobbyStats {
            rooms: self.rooms.len(),
            sessions: self.sessions.len(),
        }
    }

    pub async fn handle_text_message(self: &Arc<Self>, session_id: &str, text: &str) {
        let Some(message) = protocol::decode_client_message(text) else { return };
        let result = match message {
            ClientMessage::CreateRoom { player_name } => self
                .create_room(session_id, player_name.as_deref().unwrap_or_default())
                .await
                .map(|_| ()),
            ClientMessage::JoinRoom {
                room_id,
                player_name,
            } => {
                self.join_room(
                    session_id,
                    room_id.as_deref().unwrap_or_default(),
                    player_name.as_deref().unwrap_or_default(),
                )
                .await
            }
            ClientMessage::StartGame => self.start_game(session_id).await,
            ClientMessage::PlayerMove { direction } => {
                self.player_move(session_id, direction).await;
                Ok(())
            }
        };

        if let Err(error) = result {
            if error.is_validation() {
                tracing::debug!(session_id, %error, "request rejected");
            } else {
                tracing::error!(session_id, %error, "request failed");
            }
            self.send_error(session_id, &error);
        }
    }

    pub async fn create_room(&self, session_id: &str, player_name: &str) -> Result<String> {
        let name = sanitize_player_name(player_name).ok_or(GameError::NameRequired)?;
        let outbox = self.outbox(session_id).ok_or(GameError::PlayerNotFound)?;
        self.leave_current_room(session_id).await;

        let room = loop {
            let code = generate_room_code();
            if let Entry::Vacant(entry) = self.rooms.entry(code.clone()) {
                let room = Arc::new(Room::new(code));
                entry.insert(Arc::clone(&room));
                break room;
            }
        };
        tracing::info!(room_id = room.id(), session_id, "room created");

        room.admit(session_id, &name, outbox, true).await?;
        self.set_session_room(session_id, Some(room.id().to_string()));
        Ok(room.id().to_string())
    }

    pub async fn join_room(&self, session_id: &str, room_id: &str, player_name: &str) -> Result<()> {
        let room_id = sanitize_room_code(room_id).ok_or(GameError::RoomIdRequired)?;
        let name = sanitize_player_name(player_name).ok_or(GameError::NameRequired)?;
        let outbox = self.outbox(session_id).ok_or(GameError::PlayerNotFound)?;
        if self.session_room_id(session_id).as_deref() == Some(room_id.as_str()) {
            return Ok(());
        }
        let room = self.room(&room_id).ok_or(GameError::RoomNotFound)?;

        // A refused join must leave the session where it was.
        room.admit(session_id, &name, outbox, false).await?;
        if let Some(previous) = self.session_room_id(session_id) {
            self.leave_room(session_id, &previous).await;
        }
        self.set_session_room(session_id, Some(room_id));
        Ok(())
    }

    pub async fn start_game(self: &Arc<Self>, session_id: &str) -> Result<()> {
        let room_id = self
            .session_room_id(session_id)
            .ok_or(GameError::PlayerNotFound)?;
        let room = self.room(&room_id).ok_or(GameError::RoomNotFound)?;
        let round = room.start().await?;
        spawn_countdown(Arc::clone(self), room_id, round);
        Ok(())
    }

    pub async fn player_move(&self, session_id: &str, direction: Direction) {
        let Some(room_id) = self.session_room_id(session_id) else { return };
        let Some(room) = self.room(&room_id) else { return };
        room.steer(session_id, direction).await;
    }

    async fn leave_current_room(&self, session_id: &str) {
        let Some(room_id) = self.session_room_id(session_id) else { return };
        self.set_session_room(session_id, None);
        self.leave_room(session_id, &room_id).await;
    }

    async fn leave_room(&self, session_id: &str, room_id: &str) {
        let Some(room) = self.room(room_id) else { return };
        if room.leave(session_id).await == 0 {
            self.rooms
                .remove_if(room_id, |_, existing| Arc::ptr_eq(existing, &room));
            tracing::info!(room_id, "room closed");
        }
    }

    fn outbox(&self, session_id: &str) -> Option<UnboundedSender<String>> {
        self.sessions
            .get(session_id)
            .map(|entry| entry.outbox.clone())
    }

    fn set_session_room(&self, session_id: &str, room_id: Option<String>) {
        if let Some(mut entry) = self.sessions.get_mut(session_id) {
            entry.room_id = room_id;
        }
    }

    fn send_error(&self, session_id: &str, error: &GameError) {
        let Some(outbox) = self.outbox(session_id) else { return };
        let message = ServerMessage::Error {
            message: error.to_string(),
        };
        if let Some(payload) = protocol::encode_server_message(&message) {
            let _ = outbox.send(payload);
        }
    }
}
