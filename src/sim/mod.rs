//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Discrete fixed ticks only
//! - Seeded RNG only
//! - Fixed evaluation order (snake 1 before snake 2)
//! - No rendering, timer, or input dependencies

pub mod grid;
pub mod levels;
pub mod state;
pub mod tick;

pub use grid::Grid;
pub use levels::{LevelConfig, LevelId, SelfCollision, WallMode};
pub use state::{
    Axis, Direction, GameState, Obstacle, ObstacleKind, PlayerSlot, Snake, P1_COLOR, P2_COLOR,
};
pub use tick::{tick, Termination, TickOutcome};
