use super::constants::{INVINCIBLE_TICKS, SPEED_BOOST_TICKS};
use super::food::PowerUp;
use super::types::{Cell, Direction, SnakeSnapshot};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct Snake {
    pub body: VecDeque<Cell>,
    pub direction: Direction,
    pub color: &'static str,
    pub alive: bool,
    pub score: u32,
    pub speed_boost: u32,
    pub invincible: u32,
    pub shield_active: bool,
}

impl Snake {
    pub fn new(start: Cell, color: &'static str) -> Self {
        Self {
            body: VecDeque::from([start]),
            direction: Direction::Right,
            color,
            alive: true,
            score: 0,
            speed_boost: 0,
            invincible: 0,
            shield_active: false,
        }
    }

    /// Puts the snake back to a single segment at `start`, dropping score and power-ups.
    pub fn reset(&mut self, start: Cell) {
        *self = Self::new(start, self.color);
    }

    pub fn head(&self) -> Option<Cell> {
        self.body.front().copied()
    }

    pub fn tail(&self) -> Option<Cell> {
        self.body.back().copied()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Prepends the next head cell. The tail stays until the growth pass decides.
    pub fn advance(&mut self) {
        let Some(head) = self.head() else { return };
        self.body.push_front(head.step(self.direction));
        self.speed_boost = self.speed_boost.saturating_sub(1);
    }

    /// Index of the first non-head segment the head sits on.
    pub fn self_hit_index(&self) -> Option<usize> {
        let head = self.head()?;
        self.body
            .iter()
            .skip(1)
            .position(|cell| *cell == head)
            .map(|index| index + 1)
    }

    pub fn replace_head(&mut self, cell: Cell) {
        if let Some(head) = self.body.front_mut() {
            *head = cell;
        }
    }

    pub fn truncate_at(&mut self, index: usize) {
        self.body.truncate(index.max(1));
    }

    pub fn drop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_back();
        }
    }

    pub fn extend_tail(&mut self, extra: u32) {
        let Some(tail) = self.tail() else { return };
        for _ in 0..extra {
            self.body.push_back(tail);
        }
    }

    pub fn heading_change_allowed(&self, direction: Direction) -> bool {
        direction != self.direction.opposite()
    }

    pub fn apply_power_up(&mut self, effect: PowerUp) {
        match effect {
            PowerUp::SpeedBoost => self.speed_boost = SPEED_BOOST_TICKS,
            PowerUp::Invincible => self.invincible = INVINCIBLE_TICKS,
            PowerUp::Shield => self.shield_active = true,
        }
    }

    pub fn snapshot(&self) -> SnakeSnapshot {
        SnakeSnapshot {
            body: self.body.iter().copied().collect(),
            color: self.color.to_string(),
            alive: self.alive,
            score: self.score,
            direction: self.direction,
            speed_boost: self.speed_boost,
            invincible: self.invincible,
            shield_active: self.shield_active,
        }
    }
}
