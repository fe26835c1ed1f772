//! Per-level rule table.
//!
//! A pure lookup: every tick and every reset consults the same immutable
//! records. Policy combinations live here and nowhere else.

use serde::{Deserialize, Serialize};

/// Boundary behavior at the canvas edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallMode {
    /// Exiting one edge re-enters the opposite edge.
    Wrap,
    /// Exiting any edge ends the round.
    Lethal,
}

/// What happens when a snake's head lands on its own body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelfCollision {
    Ignore,
    /// Lose one tail segment, never dropping below the minimum length.
    Shrink,
    Kill,
}

/// Difficulty levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LevelId {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl LevelId {
    pub const ALL: [LevelId; 3] = [LevelId::Easy, LevelId::Medium, LevelId::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            LevelId::Easy => "Easy",
            LevelId::Medium => "Medium",
            LevelId::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(LevelId::Easy),
            "medium" | "med" => Some(LevelId::Medium),
            "hard" => Some(LevelId::Hard),
            _ => None,
        }
    }

    /// Rule set for this level.
    pub fn config(self) -> &'static LevelConfig {
        match self {
            LevelId::Easy => &EASY,
            LevelId::Medium => &MEDIUM,
            LevelId::Hard => &HARD,
        }
    }
}

/// Immutable rule set for one difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Starting cell edge length in pixels.
    pub cell_size: u32,
    /// Starting tick interval in milliseconds.
    pub tick_interval_ms: u64,
    pub wall_mode: WallMode,
    pub self_collision: SelfCollision,
    /// Whether hitting the opponent's body is lethal.
    pub opponent_collision: bool,
    /// Tick-interval reduction per escalation event; 0 keeps the pace fixed.
    pub speedup_per_escalation_ms: u64,
    /// The interval never drops below this once speedups apply.
    pub min_tick_interval_ms: u64,
    /// Whether escalation shrinks the grid cells.
    pub shrink_cells: bool,
}

const EASY: LevelConfig = LevelConfig {
    cell_size: 25,
    tick_interval_ms: 300,
    wall_mode: WallMode::Wrap,
    self_collision: SelfCollision::Ignore,
    opponent_collision: false,
    speedup_per_escalation_ms: 0,
    min_tick_interval_ms: 300,
    shrink_cells: true,
};

const MEDIUM: LevelConfig = LevelConfig {
    cell_size: 25,
    tick_interval_ms: 220,
    wall_mode: WallMode::Lethal,
    self_collision: SelfCollision::Shrink,
    opponent_collision: false,
    speedup_per_escalation_ms: 15,
    min_tick_interval_ms: 120,
    shrink_cells: true,
};

const HARD: LevelConfig = LevelConfig {
    cell_size: 20,
    tick_interval_ms: 160,
    wall_mode: WallMode::Lethal,
    self_collision: SelfCollision::Kill,
    opponent_collision: true,
    speedup_per_escalation_ms: 15,
    min_tick_interval_ms: 80,
    shrink_cells: true,
};
