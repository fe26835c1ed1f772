//! Snake Duel - a two-player grid snake game with escalating difficulty
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, entities, level rules, tick step)
//! - `session`: Round lifecycle, input latching, high-score tracking
//! - `scheduler`: Cancellable periodic tick plumbing
//! - `view`: Read-only snapshots for renderer/scoreboard adapters
//! - `highscores`: In-memory leaderboard

pub mod error;
pub mod highscores;
pub mod scheduler;
pub mod session;
pub mod sim;
pub mod view;

pub use error::GameError;
pub use highscores::HighScores;
pub use session::{GameSession, Phase};

/// Game configuration constants
pub mod consts {
    /// Square canvas extent in pixels.
    pub const CANVAS_SIZE: u32 = 400;
    /// Cell size floor for escalation regrids.
    pub const MIN_CELL_SIZE: u32 = 16;
    /// How many pixels a cell loses per escalation regrid.
    pub const CELL_SHRINK_STEP: u32 = 2;

    /// Points awarded per food item.
    pub const FOOD_REWARD: u32 = 10;
    /// Food items on the board after a reset.
    pub const INITIAL_FOOD_COUNT: usize = 3;
    /// Every Nth item eaten (both snakes combined) triggers an escalation.
    pub const ESCALATION_EVERY: u32 = 5;
    /// Random placement attempts before falling back to a full-grid scan.
    pub const FOOD_SPAWN_ATTEMPTS: u32 = 100;

    /// A snake never shrinks below this many segments.
    pub const MIN_SNAKE_LEN: usize = 2;
}
