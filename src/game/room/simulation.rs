use super::*;
use crate::game::constants::{DEATH_FOOD_MIN_OCCUPANCY, GRID_HEIGHT, GRID_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collision {
    Wall,
    Own(usize),
    Other,
}

impl RoomState {
    /// One lockstep advance of every snake. The phases run in a fixed order:
    /// move, collide, settle deaths, eat, grow, keep food on the board, and
    /// finally decide whether the round is over.
    pub(crate) fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<RoomEvent>> {
        let ids = self.ordered_ids();
        let mut events = Vec::new();

        for id in &ids {
            if let Some(snake) = self.snakes.get_mut(id).filter(|snake| snake.alive) {
                snake.advance();
            }
        }

        let deaths = self.resolve_collisions(&ids);
        for id in &deaths {
            self.settle_death(id, rng, &mut events)?;
        }

        let growth = self.consume_food(&ids, &mut events)?;
        for id in &ids {
            let Some(snake) = self.snakes.get_mut(id).filter(|snake| snake.alive) else { continue };
            match growth.get(id) {
                Some(amount) => snake.extend_tail(amount.saturating_sub(1)),
                None => snake.drop_tail(),
            }
        }

        if self.foods.is_empty() {
            self.foods.extend(Food::spawn(rng, self.snakes.values()));
        }

        self.check_termination(&mut events)?;
        Ok(events)
    }

    /// Every head is tested against the provisional bodies of the snakes that
    /// were alive when the step began, so evaluation order never matters.
    /// Invincible snakes skip the wall check too, so their cells may lie off
    /// the grid until the timer runs out.
    fn resolve_collisions(&mut self, ids: &[String]) -> Vec<String> {
        let obstacles: Vec<(String, Vec<Cell>)> = ids
            .iter()
            .filter_map(|id| {
                let snake = self.snakes.get(id).filter(|snake| snake.alive)?;
                Some((id.clone(), snake.body.iter().copied().collect()))
            })
            .collect();

        let mut deaths = Vec::new();
        for id in ids {
            let Some(snake) = self.snakes.get_mut(id).filter(|snake| snake.alive) else { continue };
            if snake.invincible > 0 {
                snake.invincible -= 1;
                continue;
            }
            let Some(head) = snake.head() else { continue };

            let collision = if !head.in_bounds(GRID_WIDTH, GRID_HEIGHT) {
                Some(Collision::Wall)
            } else if let Some(index) = snake.self_hit_index() {
                Some(Collision::Own(index))
            } else if obstacles
                .iter()
                .any(|(other, body)| other != id && body.contains(&head))
            {
                Some(Collision::Other)
            } else {
                None
            };
            let Some(collision) = collision else { continue };

            if snake.shield_active {
                snake.shield_active = false;
                match collision {
                    Collision::Wall => snake.replace_head(head.clamped(GRID_WIDTH, GRID_HEIGHT)),
                    Collision::Own(index) => snake.truncate_at(index),
                    Collision::Other => {}
                }
                tracing::debug!(session_id = %id, ?collision, "shield absorbed collision");
                continue;
            }

            snake.alive = false;
            tracing::debug!(session_id = %id, ?collision, score = snake.score, "snake died");
            deaths.push(id.clone());
        }
        deaths
    }

    fn settle_death<R: Rng + ?Sized>(
        &mut self,
        id: &str,
        rng: &mut R,
        events: &mut Vec<RoomEvent>,
    ) -> Result<()> {
        let player_name = self
            .participants
            .get(id)
            .map(|participant| participant.name.clone())
            .ok_or_else(|| GameError::Desync(id.to_string()))?;
        let score = self.snakes.get(id).map(|snake| snake.score).unwrap_or(0);
        self.dead.insert(id.to_string());
        events.push(RoomEvent::Died {
            player_id: id.to_string(),
            player_name: player_name.clone(),
        });

        if self.participants.len() < DEATH_FOOD_MIN_OCCUPANCY {
            return Ok(());
        }
        let mut count = 0;
        for _ in 0..score {
            let Some(food) = Food::spawn(rng, self.snakes.values()) else { break };
            self.foods.push(food);
            count += 1;
        }
        if count > 0 {
            events.push(RoomEvent::FoodsSpawned {
                player_name,
                count,
                total: self.foods.len(),
            });
        }
        Ok(())
    }

    /// Each snake eats at most one food per step: the first match in the
    /// collection's current order. Returns the growth owed per snake.
    fn consume_food(
        &mut self,
        ids: &[String],
        events: &mut Vec<RoomEvent>,
    ) -> Result<HashMap<String, u32>> {
        let mut growth = HashMap::new();
        let mut eaten: Vec<usize> = Vec::new();
        let mut activations: Vec<(String, PowerUp)> = Vec::new();

        for id in ids {
            let Some(snake) = self.snakes.get_mut(id).filter(|snake| snake.alive) else { continue };
            let Some(head) = snake.head() else { continue };
            let Some(index) = self.foods.iter().position(|food| food.cell == head) else { continue };

            let spec = self.foods[index].spec();
            snake.score += 1;
            growth.insert(id.clone(), spec.growth);
            if let Some(effect) = spec.effect {
                snake.apply_power_up(effect);
                activations.push((id.clone(), effect));
            }
            if !eaten.contains(&index) {
                eaten.push(index);
            }
        }

        eaten.sort_unstable_by(|a, b| b.cmp(a));
        for index in eaten {
            self.foods.remove(index);
        }

        for (id, effect) in activations {
            let player_name = self
                .participants
                .get(&id)
                .map(|participant| participant.name.clone())
                .ok_or(GameError::Desync(id))?;
            events.push(RoomEvent::PowerUpActivated {
                player_name,
                effect,
            });
        }
        Ok(growth)
    }

    /// Single-participant rooms never conclude here; with nobody to outlive
    /// there is no last survivor.
    fn check_termination(&mut self, events: &mut Vec<RoomEvent>) -> Result<()> {
        if self.participants.len() <= 1 {
            return Ok(());
        }
        let survivors: Vec<(&String, &Snake)> =
            self.snakes.iter().filter(|(_, snake)| snake.alive).collect();
        if survivors.len() > 1 {
            return Ok(());
        }

        let winner = match survivors.first() {
            Some((id, snake)) => {
                let participant = self
                    .participants
                    .get(*id)
                    .ok_or_else(|| GameError::Desync((*id).clone()))?;
                Some(Winner {
                    player_id: (*id).clone(),
                    player_name: participant.name.clone(),
                    score: snake.score,
                })
            }
            None => None,
        };

        self.phase = RoomPhase::Concluded;
        for participant in self.participants.values_mut() {
            participant.ready = false;
        }
        if let Some(winner) = &winner {
            events.push(RoomEvent::Won {
                player_id: winner.player_id.clone(),
                player_name: winner.player_name.clone(),
                score: winner.score,
            });
        }
        self.winner = winner;
        Ok(())
    }
}
