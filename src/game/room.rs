mod simulation;

use super::constants::{COLOR_POOL, MAX_PARTICIPANTS, MEAN_COMMENTS, START_CELLS};
use super::food::{Food, PowerUp};
use super::snake::Snake;
use super::types::{Cell, Direction, GameStateSnapshot, Participant, RoomPhase, RosterEntry, Winner};
use crate::error::{GameError, Result};
use crate::protocol::{encode_server_message, ServerMessage};
use rand::seq::IteratorRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug)]
pub struct Room {
    id: String,
    state: Mutex<RoomState>,
}

#[derive(Debug)]
pub(crate) struct RoomState {
    participants: HashMap<String, Participant>,
    snakes: HashMap<String, Snake>,
    foods: Vec<Food>,
    phase: RoomPhase,
    round: u64,
    last_tick: Instant,
    dead: HashSet<String>,
    winner: Option<Winner>,
    closed: bool,
}

/// Outcome of a simulation step that somebody outside the room must hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RoomEvent {
    Died {
        player_id: String,
        player_name: String,
    },
    FoodsSpawned {
        player_name: String,
        count: usize,
        total: usize,
    },
    PowerUpActivated {
        player_name: String,
        effect: PowerUp,
    },
    Won {
        player_id: String,
        player_name: String,
        score: u32,
    },
}

impl Room {
    pub fn new(id: String) -> Self {
        Self {
            id,
            state: Mutex::new(RoomState::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Adds a participant and tells the room about it. The creator gets
    /// `room_created`, later arrivals get `room_joined` and everybody else
    /// `player_joined`.
    pub async fn admit(
        &self,
        session_id: &str,
        name: &str,
        outbox: UnboundedSender<String>,
        creator: bool,
    ) -> Result<()> {
        let mut state = self.state.lock().await;
        state.add_participant(session_id, name, outbox)?;
        let players = state.roster();
        tracing::info!(room_id = %self.id, session_id, players = players.len(), "participant joined");

        if creator {
            state.send_to(
                session_id,
                &ServerMessage::RoomCreated {
                    room_id: self.id.clone(),
                    player_name: name.to_string(),
                    players,
                },
            );
            return Ok(());
        }

        state.send_to(
            session_id,
            &ServerMessage::RoomJoined {
                room_id: self.id.clone(),
                players: players.clone(),
                is_room_creator: false,
            },
        );
        state.broadcast_except(
            session_id,
            &ServerMessage::PlayerJoined {
                player_id: session_id.to_string(),
                player_name: name.to_string(),
                players,
            },
        );
        Ok(())
    }

    /// Removes a participant and returns how many remain. An emptied room is
    /// closed for good so that late joins cannot resurrect it.
    pub async fn leave(&self, session_id: &str) -> usize {
        let mut state = self.state.lock().await;
        if !state.remove_participant(session_id) {
            return state.participants.len();
        }
        let remaining = state.participants.len();
        tracing::info!(room_id = %self.id, session_id, remaining, "participant left");
        if remaining > 0 {
            let players = state.roster();
            state.broadcast(&ServerMessage::PlayerLeft {
                player_id: session_id.to_string(),
                players,
            });
        }
        remaining
    }

    /// Resets the board and enters the countdown. Returns the round number the
    /// countdown sequence must present at each of its steps.
    pub async fn start(&self) -> Result<u64> {
        let mut state = self.state.lock().await;
        let round = state.begin_countdown(&mut rand::thread_rng())?;
        tracing::info!(room_id = %self.id, round, "countdown started");
        state.broadcast(&ServerMessage::GameStarted);
        state.broadcast_state();
        Ok(round)
    }

    pub async fn announce_countdown(&self, round: u64, count: u32) -> bool {
        let state = self.state.lock().await;
        if !state.is_counting_down(round) {
            return false;
        }
        state.broadcast(&ServerMessage::Countdown { count });
        true
    }

    pub async fn go_live(&self, round: u64) -> bool {
        let mut state = self.state.lock().await;
        if !state.go_live(round, Instant::now()) {
            return false;
        }
        tracing::info!(room_id = %self.id, round, "simulation running");
        state.broadcast_state();
        true
    }

    pub async fn abort_countdown(&self, round: u64) {
        let mut state = self.state.lock().await;
        if state.round == round {
            state.recover();
            tracing::warn!(room_id = %self.id, round, "countdown aborted, room reset");
        }
    }

    pub async fn steer(&self, session_id: &str, direction: Direction) {
        let mut state = self.state.lock().await;
        state.change_heading(session_id, direction);
    }

    /// Advances the simulation if the room is running and its tick period has
    /// elapsed. A failing step resets the room instead of leaving it stuck.
    pub async fn advance(&self, now: Instant, tick: Duration) -> Result<bool> {
        let mut state = self.state.lock().await;
        if !state.tick_due(now, tick) {
            return Ok(false);
        }

        let mut rng = rand::thread_rng();
        let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| state.step(&mut rng)));
        let events = match outcome {
            Ok(Ok(events)) => events,
            Ok(Err(error)) => {
                tracing::error!(room_id = %self.id, %error, "simulation step failed");
                state.recover();
                return Err(GameError::TickFault(self.id.clone()));
            }
            Err(_) => {
                tracing::error!(room_id = %self.id, "simulation step panicked");
                state.recover();
                return Err(GameError::TickFault(self.id.clone()));
            }
        };

        state.last_tick = now;
        state.dispatch(&events);
        state.broadcast_state();
        if state.phase == RoomPhase::Concluded {
            tracing::info!(room_id = %self.id, winner = ?state.winner, "round concluded");
        }
        Ok(true)
    }

    /// Sends one cosmetic jab to a random dead participant of a running room.
    pub async fn heckle(&self) -> bool {
        let state = self.state.lock().await;
        let mut rng = rand::thread_rng();
        let Some(target) = state.heckle_target(&mut rng) else { return false };
        let Some(comment) = MEAN_COMMENTS.iter().choose(&mut rng) else { return false };
        state.send_to(
            &target,
            &ServerMessage::MeanComment {
                comment: comment.to_string(),
            },
        );
        true
    }

    #[cfg(test)]
    pub async fn phase(&self) -> RoomPhase {
        self.state.lock().await.phase
    }

    #[cfg(test)]
    pub async fn participant_count(&self) -> usize {
        self.state.lock().await.participants.len()
    }
}

impl RoomState {
    fn new() -> Self {
        Self {
            participants: HashMap::new(),
            snakes: HashMap::new(),
            foods: Vec::new(),
            phase: RoomPhase::Forming,
            round: 0,
            last_tick: Instant::now(),
            dead: HashSet::new(),
            winner: None,
            closed: false,
        }
    }

    fn next_free_slot(&self) -> Option<usize> {
        (0..MAX_PARTICIPANTS).find(|slot| !self.participants.values().any(|p| p.slot == *slot))
    }

    fn add_participant(
        &mut self,
        session_id: &str,
        name: &str,
        outbox: UnboundedSender<String>,
    ) -> Result<()> {
        if self.closed {
            return Err(GameError::RoomNotFound);
        }
        if self.participants.len() >= MAX_PARTICIPANTS {
            return Err(GameError::RoomFull);
        }
        let slot = self.next_free_slot().ok_or(GameError::RoomFull)?;
        let color = COLOR_POOL[slot];
        let (x, y) = START_CELLS[slot];

        self.participants.insert(
            session_id.to_string(),
            Participant {
                name: name.to_string(),
                color,
                ready: false,
                slot,
                outbox,
            },
        );
        self.snakes
            .insert(session_id.to_string(), Snake::new(Cell::new(x, y), color));
        Ok(())
    }

    fn remove_participant(&mut self, session_id: &str) -> bool {
        let removed = self.participants.remove(session_id).is_some();
        self.snakes.remove(session_id);
        self.dead.remove(session_id);
        if self.participants.is_empty() {
            self.closed = true;
        }
        removed
    }

    /// Session ids ordered by slot, which is also join order.
    fn ordered_ids(&self) -> Vec<String> {
        let mut ids: Vec<(&String, usize)> = self
            .participants
            .iter()
            .map(|(id, participant)| (id, participant.slot))
            .collect();
        ids.sort_by_key(|(_, slot)| *slot);
        ids.into_iter().map(|(id, _)| id.clone()).collect()
    }

    fn roster(&self) -> Vec<RosterEntry> {
        self.ordered_ids()
            .into_iter()
            .filter_map(|id| {
                let participant = self.participants.get(&id)?;
                Some(RosterEntry {
                    name: participant.name.clone(),
                    color: participant.color.to_string(),
                    ready: participant.ready,
                    id,
                })
            })
            .collect()
    }

    fn begin_countdown<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<u64> {
        if self.phase.is_in_progress() {
            return Err(GameError::GameInProgress);
        }

        for (id, participant) in &mut self.participants {
            participant.ready = true;
            let (x, y) = START_CELLS[participant.slot];
            match self.snakes.get_mut(id) {
                Some(snake) => snake.reset(Cell::new(x, y)),
                None => {
                    self.snakes
                        .insert(id.clone(), Snake::new(Cell::new(x, y), participant.color));
                }
            }
        }
        self.dead.clear();
        self.winner = None;
        self.foods.clear();
        self.foods.extend(Food::spawn(rng, self.snakes.values()));

        self.phase = RoomPhase::CountingDown;
        self.round += 1;
        Ok(self.round)
    }

    fn is_counting_down(&self, round: u64) -> bool {
        self.phase == RoomPhase::CountingDown && self.round == round
    }

    fn go_live(&mut self, round: u64, now: Instant) -> bool {
        if !self.is_counting_down(round) {
            return false;
        }
        self.phase = RoomPhase::Running;
        self.last_tick = now;
        true
    }

    /// Drops back to a phase from which a fresh start is accepted.
    fn recover(&mut self) {
        self.phase = RoomPhase::Forming;
        for participant in self.participants.values_mut() {
            participant.ready = false;
        }
    }

    fn change_heading(&mut self, session_id: &str, direction: Direction) {
        if self.phase != RoomPhase::Running {
            return;
        }
        let Some(snake) = self.snakes.get_mut(session_id) else { return };
        if snake.heading_change_allowed(direction) {
            snake.direction = direction;
        }
    }

    fn tick_due(&self, now: Instant, tick: Duration) -> bool {
        self.phase == RoomPhase::Running && now.saturating_duration_since(self.last_tick) > tick
    }

    fn heckle_target<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String> {
        if self.phase != RoomPhase::Running {
            return None;
        }
        self.dead
            .iter()
            .filter(|id| self.participants.contains_key(*id))
            .choose(rng)
            .cloned()
    }

    fn snapshot(&self) -> GameStateSnapshot {
        GameStateSnapshot {
            snakes: self
                .snakes
                .iter()
                .map(|(id, snake)| (id.clone(), snake.snapshot()))
                .collect(),
            foods: self.foods.iter().map(Food::snapshot).collect(),
            running: self.phase == RoomPhase::Running,
        }
    }

    fn dispatch(&self, events: &[RoomEvent]) {
        for event in events {
            match event {
                RoomEvent::Died {
                    player_id,
                    player_name,
                } => self.send_to(
                    player_id,
                    &ServerMessage::PlayerDied {
                        player_name: player_name.clone(),
                    },
                ),
                RoomEvent::FoodsSpawned {
                    player_name,
                    count,
                    total,
                } => self.broadcast(&ServerMessage::FoodsSpawned {
                    player_name: player_name.clone(),
                    count: *count,
                    total: *total,
                }),
                RoomEvent::PowerUpActivated {
                    player_name,
                    effect,
                } => self.broadcast(&ServerMessage::PowerUpActivated {
                    player_name: player_name.clone(),
                    effect: *effect,
                }),
                RoomEvent::Won {
                    player_id,
                    player_name,
                    score,
                } => self.send_to(
                    player_id,
                    &ServerMessage::PlayerWon {
                        player_name: player_name.clone(),
                        score: *score,
                    },
                ),
            }
        }
    }

    fn broadcast_state(&self) {
        self.broadcast(&ServerMessage::GameState(self.snapshot()));
    }

    fn send_to(&self, session_id: &str, message: &ServerMessage) {
        let Some(participant) = self.participants.get(session_id) else { return };
        let Some(payload) = encode_server_message(message) else { return };
        let _ = participant.outbox.send(payload);
    }

    fn broadcast(&self, message: &ServerMessage) {
        self.broadcast_filtered(message, |_| true);
    }

    fn broadcast_except(&self, session_id: &str, message: &ServerMessage) {
        self.broadcast_filtered(message, |id| id != session_id);
    }

    fn broadcast_filtered(&self, message: &ServerMessage, include: impl Fn(&str) -> bool) {
        let Some(payload) = encode_server_message(message) else { return };
        for (id, participant) in &self.participants {
            if include(id) {
                let _ = participant.outbox.send(payload.clone());
            }
        }
    }
}
