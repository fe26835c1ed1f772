//! Read-only surfaces for the rendering and scoreboard adapters.
//!
//! The core never draws or touches a DOM; collaborators pull a [`Snapshot`]
//! once per tick and a [`ScoreReport`] after score-affecting events, and
//! must not feed anything back.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::session::Phase;
use crate::sim::{Direction, Obstacle, Snake};

/// Per-snake slice of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnakeView {
    /// Body tiles, head first.
    pub body: Vec<IVec2>,
    pub direction: Direction,
    pub color: [u8; 3],
    pub score: u32,
}

impl SnakeView {
    pub(crate) fn of(snake: &Snake) -> Self {
        Self {
            body: snake.body.iter().copied().collect(),
            direction: snake.direction,
            color: snake.color,
            score: snake.score,
        }
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tile_count: i32,
    pub cell_size: u32,
    pub snakes: [SnakeView; 2],
    pub foods: Vec<IVec2>,
    pub obstacles: Vec<Obstacle>,
    pub phase: Phase,
    pub game_over_message: Option<String>,
    pub high_score: u32,
}

/// Scoreboard numbers, published after every score-affecting event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// `[P1, P2]`.
    pub scores: [u32; 2],
    pub high_score: u32,
    /// Live pace relative to the level's base interval, in percent.
    /// 100 at round start; rises as escalation shortens the interval.
    pub speed_percent: u32,
}

/// Paints frames from snapshots. Must not mutate game state.
pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot);
}

/// Receives score updates. Must not mutate game state.
pub trait ScoreboardSink {
    fn publish(&mut self, report: &ScoreReport);
}
