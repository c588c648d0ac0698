use super::food::FoodKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn in_bounds(self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.x < width && self.y >= 0 && self.y < height
    }

    pub fn clamped(self, width: i32, height: i32) -> Self {
        Self {
            x: self.x.clamp(0, width - 1),
            y: self.y.clamp(0, height - 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomPhase {
    Forming,
    CountingDown,
    Running,
    Concluded,
}

impl RoomPhase {
    /// A room in either of these phases refuses a fresh start request.
    pub fn is_in_progress(self) -> bool {
        matches!(self, RoomPhase::CountingDown | RoomPhase::Running)
    }
}

#[derive(Debug, Clone)]
pub struct Participant {
    pub name: String,
    pub color: &'static str,
    pub ready: bool,
    pub slot: usize,
    pub outbox: UnboundedSender<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Winner {
    pub player_id: String,
    pub player_name: String,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
    pub color: String,
    pub ready: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SnakeSnapshot {
    pub body: Vec<Cell>,
    pub color: String,
    pub alive: bool,
    pub score: u32,
    pub direction: Direction,
    #[serde(rename = "speedBoost")]
    pub speed_boost: u32,
    pub invincible: u32,
    #[serde(rename = "shieldActive")]
    pub shield_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FoodSnapshot {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "type")]
    pub kind: FoodKind,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameStateSnapshot {
    pub snakes: HashMap<String, SnakeSnapshot>,
    pub foods: Vec<FoodSnapshot>,
    pub running: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for direction in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            assert_ne!(direction, direction.opposite());
            assert_eq!(direction, direction.opposite().opposite());
        }
    }

    #[test]
    fn clamp_pulls_cells_back_onto_the_border() {
        assert_eq!(Cell::new(-1, 4).clamped(40, 30), Cell::new(0, 4));
        assert_eq!(Cell::new(40, 30).clamped(40, 30), Cell::new(39, 29));
        assert!(!Cell::new(40, 0).in_bounds(40, 30));
        assert!(Cell::new(39, 29).in_bounds(40, 30));
    }

    #[test]
    fn direction_parses_uppercase_names() {
        let direction: Direction = serde_json::from_str("\"LEFT\"").expect("direction");
        assert_eq!(direction, Direction::Left);
    }
}
