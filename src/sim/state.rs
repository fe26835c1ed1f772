//! Entity and round state.
//!
//! Everything a round mutates lives in [`GameState`]; it is rebuilt wholesale
//! on every reset or level change.

use std::collections::VecDeque;
use std::fmt;

use glam::IVec2;
use log::debug;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::levels::LevelConfig;
use crate::consts::{CANVAS_SIZE, FOOD_SPAWN_ATTEMPTS, INITIAL_FOOD_COUNT};

/// Player one's display color (lime).
pub const P1_COLOR: [u8; 3] = [0x00, 0xff, 0x00];
/// Player two's display color (dodger blue).
pub const P2_COLOR: [u8; 3] = [0x1e, 0x90, 0xff];

/// Which of the two snakes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    P1,
    P2,
}

impl PlayerSlot {
    /// Fixed evaluation order: P1 is always checked before P2.
    pub const BOTH: [PlayerSlot; 2] = [PlayerSlot::P1, PlayerSlot::P2];

    pub fn index(self) -> usize {
        match self {
            PlayerSlot::P1 => 0,
            PlayerSlot::P2 => 1,
        }
    }

    pub fn opponent(self) -> PlayerSlot {
        match self {
            PlayerSlot::P1 => PlayerSlot::P2,
            PlayerSlot::P2 => PlayerSlot::P1,
        }
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerSlot::P1 => write!(f, "P1"),
            PlayerSlot::P2 => write!(f, "P2"),
        }
    }
}

/// Movement axis. Direction changes must switch axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Axis-aligned movement direction. Diagonals are unrepresentable.
///
/// Y grows downward, matching canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit tile offset for one advance.
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::Horizontal,
            Direction::Up | Direction::Down => Axis::Vertical,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.delta() + other.delta() == IVec2::ZERO
    }
}

/// One snake: body tiles head-first, its heading, and its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snake {
    /// Head is the front. Never shorter than two segments.
    pub body: VecDeque<IVec2>,
    pub direction: Direction,
    /// Steering applied at the start of the next advance.
    pub pending_direction: Option<Direction>,
    pub score: u32,
    /// Display color. Cosmetic only.
    pub color: [u8; 3],
}

impl Snake {
    /// Two-segment snake with the tail trailing opposite the heading.
    pub fn new(head: IVec2, direction: Direction, color: [u8; 3]) -> Self {
        let mut body = VecDeque::with_capacity(8);
        body.push_back(head);
        body.push_back(head - direction.delta());
        Self {
            body,
            direction,
            pending_direction: None,
            score: 0,
            color,
        }
    }

    pub fn head(&self) -> IVec2 {
        *self.body.front().expect("snake body is never empty")
    }

    pub fn occupies(&self, pos: IVec2) -> bool {
        self.body.contains(&pos)
    }

    /// Head overlapping any non-head segment of its own body.
    pub fn bites_itself(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|&seg| seg == head)
    }
}

/// Obstacle kinds. Bombs are the only kind so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Bomb,
}

/// A permanent lethal tile, placed by escalation events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: IVec2,
    pub kind: ObstacleKind,
}

/// Complete per-round simulation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub grid: Grid,
    /// `snakes[0]` is P1, `snakes[1]` is P2.
    pub snakes: [Snake; 2],
    pub foods: Vec<IVec2>,
    pub obstacles: Vec<Obstacle>,
    /// Items eaten by both snakes this round; drives escalation.
    pub total_eaten: u32,
    /// Live tick interval in milliseconds. Escalation may lower it.
    pub tick_interval_ms: u64,
    /// Ticks simulated this round.
    pub ticks: u64,
}

impl GameState {
    /// Fresh round state: spawn layout, no obstacles, seeded food.
    ///
    /// P1 starts near the top-left heading right, P2 near the bottom-right
    /// heading left. The bodies cannot overlap on any playable grid.
    pub fn new(rules: &LevelConfig, rng: &mut Pcg32) -> Self {
        let grid = Grid::new(CANVAS_SIZE, rules.cell_size);
        let n = grid.tile_count();
        let p1 = Snake::new(IVec2::new(5, 5), Direction::Right, P1_COLOR);
        let p2 = Snake::new(IVec2::new(n - 6, n - 6), Direction::Left, P2_COLOR);

        let mut state = Self {
            grid,
            snakes: [p1, p2],
            foods: Vec::new(),
            obstacles: Vec::new(),
            total_eaten: 0,
            tick_interval_ms: rules.tick_interval_ms,
            ticks: 0,
        };
        state.spawn_food(INITIAL_FOOD_COUNT, rng);
        state
    }

    pub fn snake(&self, slot: PlayerSlot) -> &Snake {
        &self.snakes[slot.index()]
    }

    pub fn snake_mut(&mut self, slot: PlayerSlot) -> &mut Snake {
        &mut self.snakes[slot.index()]
    }

    /// Whether any snake segment, food item, or obstacle sits on this tile.
    pub fn occupied(&self, pos: IVec2) -> bool {
        self.snakes.iter().any(|s| s.occupies(pos))
            || self.foods.contains(&pos)
            || self.obstacles.iter().any(|o| o.pos == pos)
    }

    /// Place `count` food items on free tiles.
    pub fn spawn_food(&mut self, count: usize, rng: &mut Pcg32) {
        for _ in 0..count {
            if let Some(pos) = self.roll_food_tile(rng) {
                debug!("food spawned at ({}, {})", pos.x, pos.y);
                self.foods.push(pos);
            }
        }
    }

    /// Bounded random retry, then an exhaustive free-cell scan. Returns
    /// `None` only when the grid has no free tile at all.
    fn roll_food_tile(&self, rng: &mut Pcg32) -> Option<IVec2> {
        for _ in 0..FOOD_SPAWN_ATTEMPTS {
            let pos = self.grid.random_tile(rng);
            if !self.occupied(pos) {
                return Some(pos);
            }
        }
        let free: Vec<IVec2> = self.grid.cells().filter(|&c| !self.occupied(c)).collect();
        if free.is_empty() {
            None
        } else {
            Some(free[rng.random_range(0..free.len())])
        }
    }
}
