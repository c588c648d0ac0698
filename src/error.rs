use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Player name is required")]
    NameRequired,

    #[error("Room ID is required")]
    RoomIdRequired,

    #[error("Room not found")]
    RoomNotFound,

    #[error("Room is full (max 4 players)")]
    RoomFull,

    #[error("Game already in progress")]
    GameInProgress,

    #[error("Player not found")]
    PlayerNotFound,

    #[error("Snake {0} has no matching participant")]
    Desync(String),

    #[error("Tick processing failed in room {0}")]
    TickFault(String),
}

impl GameError {
    /// Validation errors go back to the caller; the rest are internal faults.
    pub fn is_validation(&self) -> bool {
        !matches!(self, GameError::Desync(_) | GameError::TickFault(_))
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_full_message_names_the_cap() {
        assert_eq!(GameError::RoomFull.to_string(), "Room is full (max 4 players)");
        assert!(GameError::RoomFull.is_validation());
        assert!(!GameError::TickFault("abc".to_string()).is_validation());
    }
}
