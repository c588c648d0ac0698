use crate::game::food::PowerUp;
use crate::game::types::{Direction, GameStateSnapshot, RosterEntry};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    CreateRoom {
        #[serde(rename = "playerName")]
        player_name: Option<String>,
    },
    JoinRoom {
        #[serde(rename = "roomId")]
        room_id: Option<String>,
        #[serde(rename = "playerName")]
        player_name: Option<String>,
    },
    StartGame,
    PlayerMove {
        direction: Direction,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    RoomCreated {
        room_id: String,
        player_name: String,
        players: Vec<RosterEntry>,
    },
    #[serde(rename_all = "camelCase")]
    RoomJoined {
        room_id: String,
        players: Vec<RosterEntry>,
        is_room_creator: bool,
    },
    #[serde(rename_all = "camelCase")]
    PlayerJoined {
        player_id: String,
        player_name: String,
        players: Vec<RosterEntry>,
    },
    #[serde(rename_all = "camelCase")]
    PlayerLeft {
        player_id: String,
        players: Vec<RosterEntry>,
    },
    GameStarted,
    Countdown {
        count: u32,
    },
    GameState(GameStateSnapshot),
    #[serde(rename_all = "camelCase")]
    PlayerDied {
        player_name: String,
    },
    #[serde(rename_all = "camelCase")]
    PlayerWon {
        player_name: String,
        score: u32,
    },
    #[serde(rename_all = "camelCase")]
    FoodsSpawned {
        player_name: String,
        count: usize,
        total: usize,
    },
    #[serde(rename_all = "camelCase")]
    PowerUpActivated {
        player_name: String,
        effect: PowerUp,
    },
    MeanComment {
        comment: String,
    },
    Error {
        message: String,
    },
}

pub fn decode_client_message(text: &str) -> Option<ClientMessage> {
    match serde_json::from_str(text) {
        Ok(message) => Some(message),
        Err(error) => {
            tracing::debug!(%error, "dropping malformed client message");
            None
        }
    }
}

pub fn encode_server_message(message: &ServerMessage) -> Option<String> {
    match serde_json::to_string(message) {
        Ok(payload) => Some(payload),
        Err(error) => {
            tracing::error!(%error, "failed to encode server message");
            None
        }
    }
}
