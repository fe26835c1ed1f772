//! The per-tick simulation step.
//!
//! One call advances the whole round: both snakes move (P1 first), food is
//! consumed and replaced, every fifth item eaten escalates the difficulty,
//! and a joint collision pass decides whether the round ends. The first
//! lethal check to fire stops the round for both snakes and names the snake
//! responsible.

use std::fmt;

use log::{debug, info};
use rand_pcg::Pcg32;

use super::levels::{LevelConfig, SelfCollision, WallMode};
use super::state::{GameState, Obstacle, ObstacleKind, PlayerSlot};
use crate::consts::{ESCALATION_EVERY, FOOD_REWARD, MIN_SNAKE_LEN};

/// Why a round ended. Carries the snake responsible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    WallHit(PlayerSlot),
    SnakeCollision(PlayerSlot),
    SelfBite(PlayerSlot),
    ObstacleHit(PlayerSlot),
}

impl Termination {
    pub fn player(&self) -> PlayerSlot {
        match *self {
            Termination::WallHit(p)
            | Termination::SnakeCollision(p)
            | Termination::SelfBite(p)
            | Termination::ObstacleHit(p) => p,
        }
    }
}

impl fmt::Display for Termination {
    /// The end-of-round overlay message.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::WallHit(p) => write!(f, "{p} hit the wall!"),
            Termination::SnakeCollision(p) => write!(f, "{p} crashed into the other snake!"),
            Termination::SelfBite(p) => write!(f, "{p} bit itself!"),
            Termination::ObstacleHit(p) => write!(f, "BOOM! {p} hit a bomb."),
        }
    }
}

/// Result of one simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Ended(Termination),
}

/// Advance the round by one tick.
///
/// Evaluation order is fixed: P1 advances, P2 advances, then the joint
/// collision pass runs over the moved heads. A lethal wall exit aborts the
/// tick immediately; the other snake does not move.
pub fn tick(state: &mut GameState, rules: &LevelConfig, rng: &mut Pcg32) -> TickOutcome {
    state.ticks += 1;

    for slot in PlayerSlot::BOTH {
        if let Some(termination) = advance_snake(state, rules, slot, rng) {
            return TickOutcome::Ended(termination);
        }
    }
    if let Some(termination) = resolve_collisions(state, rules) {
        return TickOutcome::Ended(termination);
    }
    TickOutcome::Continue
}

/// Move one snake a single tile: apply pending steering, step the head,
/// settle food. Returns the termination for a lethal wall exit.
fn advance_snake(
    state: &mut GameState,
    rules: &LevelConfig,
    slot: PlayerSlot,
    rng: &mut Pcg32,
) -> Option<Termination> {
    let idx = slot.index();

    if let Some(dir) = state.snakes[idx].pending_direction.take() {
        state.snakes[idx].direction = dir;
    }

    let grid = state.grid;
    let candidate = state.snakes[idx].head() + state.snakes[idx].direction.delta();
    let head = match rules.wall_mode {
        WallMode::Wrap => grid.wrap(candidate),
        WallMode::Lethal => {
            if !grid.contains(candidate) {
                return Some(Termination::WallHit(slot));
            }
            candidate
        }
    };

    state.snakes[idx].body.push_front(head);

    if let Some(food_idx) = state.foods.iter().position(|&f| f == head) {
        // Keep the tail: the snake grows by one segment.
        state.foods.remove(food_idx);
        state.snakes[idx].score += FOOD_REWARD;
        state.total_eaten += 1;
        debug!(
            "{slot} ate food at ({}, {}), score {}",
            head.x, head.y, state.snakes[idx].score
        );
        state.spawn_food(1, rng);
        if state.total_eaten % ESCALATION_EVERY == 0 {
            escalate(state, rules, rng);
        }
    } else {
        state.snakes[idx].body.pop_back();
    }

    None
}

/// Every Nth item eaten: drop a bomb, then tighten the screws per level.
///
/// Bombs land on a uniformly random tile with no occupancy check; burying
/// food or grazing a body is accepted survival-mode behavior.
fn escalate(state: &mut GameState, rules: &LevelConfig, rng: &mut Pcg32) {
    let pos = state.grid.random_tile(rng);
    state.obstacles.push(Obstacle {
        pos,
        kind: ObstacleKind::Bomb,
    });

    if rules.shrink_cells {
        state.grid.shrink_cells();
    }
    if rules.speedup_per_escalation_ms > 0 {
        state.tick_interval_ms = state
            .tick_interval_ms
            .saturating_sub(rules.speedup_per_escalation_ms)
            .max(rules.min_tick_interval_ms);
    }

    info!(
        "escalation: bomb at ({}, {}), grid {} tiles, tick {} ms",
        pos.x,
        pos.y,
        state.grid.tile_count(),
        state.tick_interval_ms
    );
}

/// Joint collision pass, run after both snakes have advanced.
///
/// Priority: opponent body, then self-bite, then bombs; P1 before P2 within
/// each category. The first lethal hit reports the cause.
fn resolve_collisions(state: &mut GameState, rules: &LevelConfig) -> Option<Termination> {
    if rules.opponent_collision {
        for slot in PlayerSlot::BOTH {
            let head = state.snake(slot).head();
            if state.snake(slot.opponent()).occupies(head) {
                return Some(Termination::SnakeCollision(slot));
            }
        }
    }

    for slot in PlayerSlot::BOTH {
        if !state.snake(slot).bites_itself() {
            continue;
        }
        match rules.self_collision {
            SelfCollision::Ignore => {}
            SelfCollision::Shrink => {
                let snake = state.snake_mut(slot);
                if snake.body.len() > MIN_SNAKE_LEN {
                    snake.body.pop_back();
                    debug!("{slot} shrank to {} segments", snake.body.len());
                }
            }
            SelfCollision::Kill => return Some(Termination::SelfBite(slot)),
        }
    }

    for slot in PlayerSlot::BOTH {
        let head = state.snake(slot).head();
        if state.obstacles.iter().any(|o| o.pos == head) {
            return Some(Termination::ObstacleHit(slot));
        }
    }

    None
}
