//! Configuration error taxonomy.
//!
//! Round endings are not errors; they travel as
//! [`Termination`](crate::sim::Termination) outcomes. Everything here is a
//! rejected request that leaves the session exactly as it was.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The requested level id is not in the configured set.
    #[error("unknown level `{0}`")]
    UnknownLevel(String),

    /// Levels can only change from `Idle` or `GameOver`.
    #[error("level can only be changed between rounds")]
    LevelChangeWhileRunning,
}
