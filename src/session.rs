//! Round lifecycle: the state machine wrapping the simulation step.
//!
//! A session owns every mutable piece of the game: the round state, the
//! level selection, the input latches, the logical timer handle, and the
//! high score table. Collaborators only ever see snapshots.

use std::time::Duration;

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::highscores::HighScores;
use crate::scheduler::TimerHandle;
use crate::sim::{self, Direction, GameState, LevelId, PlayerSlot, Termination, TickOutcome};
use crate::view::{ScoreReport, SnakeView, Snapshot};

/// Session lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Phase {
    /// Before the first start, or after a reset/level change.
    #[default]
    Idle,
    Running,
    /// Final scores and the cause stay inspectable until the next start.
    GameOver,
}

/// Owns all mutable game state and exposes the lifecycle operations.
pub struct GameSession {
    level: LevelId,
    state: GameState,
    phase: Phase,
    game_over_message: Option<String>,
    high_scores: HighScores,
    timer: TimerHandle,
    /// Per-tick steering latches: the first legal request per snake wins.
    steered: [bool; 2],
    rng: Pcg32,
}

impl GameSession {
    /// Session with an explicit seed. Given the same seed and the same input
    /// sequence, a round replays identically.
    pub fn new(level: LevelId, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = GameState::new(level.config(), &mut rng);
        Self {
            level,
            state,
            phase: Phase::Idle,
            game_over_message: None,
            high_scores: HighScores::new(),
            timer: TimerHandle::default(),
            steered: [false; 2],
            rng,
        }
    }

    /// Session seeded from OS entropy.
    pub fn with_entropy(level: LevelId) -> Self {
        Self::new(level, rand::rng().random())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level(&self) -> LevelId {
        self.level
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn timer(&self) -> &TimerHandle {
        &self.timer
    }

    pub fn high_score(&self) -> u32 {
        self.high_scores.best()
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn game_over_message(&self) -> Option<&str> {
        self.game_over_message.as_deref()
    }

    /// Live tick interval; escalation shortens it mid-round.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.state.tick_interval_ms)
    }

    /// Start (or restart) a round: cancel any live timer, rebuild entities,
    /// arm the timer at the level's base pace, run.
    pub fn start(&mut self) {
        self.timer.cancel();
        self.rebuild();
        self.phase = Phase::Running;
        self.timer.arm(self.tick_interval());
        info!("round started on {}", self.level.as_str());
    }

    /// Stop and rebuild without running. High scores survive.
    pub fn reset(&mut self) {
        self.timer.cancel();
        self.rebuild();
        self.phase = Phase::Idle;
        info!("session reset");
    }

    /// Switch levels. Only legal between rounds; rejections leave the
    /// session untouched. Does not auto-start.
    pub fn set_level(&mut self, id: &str) -> Result<(), GameError> {
        let level = LevelId::from_str(id).ok_or_else(|| GameError::UnknownLevel(id.to_string()))?;
        if self.phase == Phase::Running {
            return Err(GameError::LevelChangeWhileRunning);
        }
        self.level = level;
        self.timer.cancel();
        self.rebuild();
        self.phase = Phase::Idle;
        info!("level set to {}", level.as_str());
        Ok(())
    }

    /// Directional intent for one snake.
    ///
    /// The first legal request per snake per tick wins; later requests in
    /// the same tick are no-ops. A request on the current movement axis
    /// (reversal or re-press) is rejected without consuming the latch.
    /// Input outside a running round is ignored.
    pub fn steer(&mut self, player: PlayerSlot, direction: Direction) {
        if self.phase != Phase::Running {
            debug!("steer ignored: no round running");
            return;
        }
        if self.steered[player.index()] {
            return;
        }
        if direction.axis() == self.state.snake(player).direction.axis() {
            return;
        }
        self.state.snake_mut(player).pending_direction = Some(direction);
        self.steered[player.index()] = true;
    }

    /// Run one simulation step and react to its outcome.
    ///
    /// A no-op outside `Running`: stale timer fires and out-of-order calls
    /// land here harmlessly.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Continue;
        }
        self.steered = [false; 2];

        let outcome = sim::tick(&mut self.state, self.level.config(), &mut self.rng);
        match outcome {
            TickOutcome::Continue => {
                // Escalation may have changed the pace; keep the timer honest.
                if self.timer.interval() != self.tick_interval() {
                    self.timer.arm(self.tick_interval());
                }
            }
            TickOutcome::Ended(termination) => self.end_round(termination),
        }
        outcome
    }

    fn rebuild(&mut self) {
        self.state = GameState::new(self.level.config(), &mut self.rng);
        self.game_over_message = None;
        self.steered = [false; 2];
    }

    fn end_round(&mut self, termination: Termination) {
        self.timer.cancel();
        self.phase = Phase::GameOver;
        let message = termination.to_string();
        info!("game over after {} ticks: {message}", self.state.ticks);
        self.game_over_message = Some(message);

        // High score is the best individual snake score across rounds.
        let best = self.state.snakes.iter().map(|s| s.score).max().unwrap_or(0);
        self.high_scores.add_score(best, self.level, self.state.ticks);
    }

    /// Read-only frame for the renderer, taken after a step completes.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tile_count: self.state.grid.tile_count(),
            cell_size: self.state.grid.cell_size(),
            snakes: [
                SnakeView::of(self.state.snake(PlayerSlot::P1)),
                SnakeView::of(self.state.snake(PlayerSlot::P2)),
            ],
            foods: self.state.foods.clone(),
            obstacles: self.state.obstacles.clone(),
            phase: self.phase,
            game_over_message: self.game_over_message.clone(),
            high_score: self.high_score(),
        }
    }

    /// Scoreboard numbers plus the derived speed percentage.
    pub fn score_report(&self) -> ScoreReport {
        let base = self.level.config().tick_interval_ms;
        ScoreReport {
            scores: [
                self.state.snake(PlayerSlot::P1).score,
                self.state.snake(PlayerSlot::P2).score,
            ],
            high_score: self.high_score(),
            speed_percent: (base * 100 / self.state.tick_interval_ms) as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use std::collections::VecDeque;

    fn running_session(level: LevelId) -> GameSession {
        let mut session = GameSession::new(level, 7);
        session.start();
        session
    }

    /// Aim P1 at the lethal east wall so the next ticks end the round.
    fn doom_p1(session: &mut GameSession) {
        let n = session.state.grid.tile_count();
        let snake = session.state.snake_mut(PlayerSlot::P1);
        snake.body = VecDeque::from(vec![IVec2::new(n - 1, 3), IVec2::new(n - 2, 3)]);
        snake.direction = Direction::Right;
        session.state.foods.clear();
    }

    #[test]
    fn test_phase_machine() {
        let mut session = GameSession::new(LevelId::Medium, 7);
        assert_eq!(session.phase(), Phase::Idle);
        assert!(!session.timer().is_armed());

        session.start();
        assert_eq!(session.phase(), Phase::Running);
        assert!(session.timer().is_armed());
        assert_eq!(session.tick_interval(), Duration::from_millis(220));

        doom_p1(&mut session);
        let outcome = session.tick();
        assert!(matches!(outcome, TickOutcome::Ended(_)));
        assert_eq!(session.phase(), Phase::GameOver);
        assert!(!session.timer().is_armed());
        assert_eq!(session.game_over_message(), Some("P1 hit the wall!"));

        // Restart clears the overlay and runs again.
        session.start();
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.game_over_message(), None);
    }

    #[test]
    fn test_tick_outside_running_is_noop() {
        let mut session = GameSession::new(LevelId::Easy, 7);
        let before = session.state().clone();
        assert_eq!(session.tick(), TickOutcome::Continue);
        assert_eq!(*session.state(), before);
    }

    #[test]
    fn test_steer_latch_honors_first_request() {
        let mut session = running_session(LevelId::Easy);

        // P1 moves right; Up is legal, the follow-up Down is latched out.
        session.steer(PlayerSlot::P1, Direction::Up);
        session.steer(PlayerSlot::P1, Direction::Down);
        assert_eq!(
            session.state().snake(PlayerSlot::P1).pending_direction,
            Some(Direction::Up)
        );

        // Next tick opens a fresh latch; the snake now moves up, so a
        // horizontal turn is the legal follow-up.
        session.tick();
        session.steer(PlayerSlot::P1, Direction::Left);
        assert_eq!(
            session.state().snake(PlayerSlot::P1).pending_direction,
            Some(Direction::Left)
        );
    }

    #[test]
    fn test_steer_rejects_same_axis_without_consuming_latch() {
        let mut session = running_session(LevelId::Easy);

        // Reversal attempt: rejected outright.
        session.steer(PlayerSlot::P1, Direction::Left);
        assert_eq!(session.state().snake(PlayerSlot::P1).pending_direction, None);

        // The latch is still free for a legal turn.
        session.steer(PlayerSlot::P1, Direction::Down);
        assert_eq!(
            session.state().snake(PlayerSlot::P1).pending_direction,
            Some(Direction::Down)
        );
    }

    #[test]
    fn test_steer_before_start_is_ignored() {
        let mut session = GameSession::new(LevelId::Easy, 7);
        session.steer(PlayerSlot::P1, Direction::Up);
        assert_eq!(session.state().snake(PlayerSlot::P1).pending_direction, None);
    }

    #[test]
    fn test_latches_are_per_snake() {
        let mut session = running_session(LevelId::Easy);
        session.steer(PlayerSlot::P1, Direction::Up);
        // P2 moves left; its latch is independent of P1's.
        session.steer(PlayerSlot::P2, Direction::Down);
        assert_eq!(
            session.state().snake(PlayerSlot::P2).pending_direction,
            Some(Direction::Down)
        );
    }

    #[test]
    fn test_set_level_rejections_leave_session_untouched() {
        let mut session = running_session(LevelId::Easy);

        assert_eq!(
            session.set_level("nightmare"),
            Err(GameError::UnknownLevel("nightmare".to_string()))
        );
        assert_eq!(session.level(), LevelId::Easy);
        assert_eq!(session.phase(), Phase::Running);

        assert_eq!(
            session.set_level("hard"),
            Err(GameError::LevelChangeWhileRunning)
        );
        assert_eq!(session.level(), LevelId::Easy);
        assert_eq!(session.phase(), Phase::Running);
    }

    #[test]
    fn test_set_level_between_rounds() {
        let mut session = GameSession::new(LevelId::Easy, 7);
        assert_eq!(session.set_level("hard"), Ok(()));
        assert_eq!(session.level(), LevelId::Hard);
        // Level change resets but does not auto-start.
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.tick_interval(), Duration::from_millis(160));
    }

    #[test]
    fn test_high_score_survives_restart() {
        let mut session = running_session(LevelId::Medium);
        session.state.snake_mut(PlayerSlot::P1).score = 40;
        session.state.snake_mut(PlayerSlot::P2).score = 70;
        doom_p1(&mut session);
        session.tick();
        assert_eq!(session.high_score(), 70);

        session.start();
        assert_eq!(session.high_score(), 70);
        assert_eq!(session.state().snake(PlayerSlot::P1).score, 0);

        // A weaker round leaves the record alone.
        session.state.snake_mut(PlayerSlot::P1).score = 10;
        doom_p1(&mut session);
        session.tick();
        assert_eq!(session.high_score(), 70);
    }

    #[test]
    fn test_stale_timer_epoch_rejected_after_game_over() {
        let mut session = running_session(LevelId::Medium);
        let epoch = session.timer().epoch();
        assert!(session.timer().accepts(epoch));

        doom_p1(&mut session);
        session.tick();
        // The in-flight tick from the old arm no longer passes the gate.
        assert!(!session.timer().accepts(epoch));
    }

    #[test]
    fn test_score_report_tracks_speedup() {
        let mut session = running_session(LevelId::Medium);
        assert_eq!(session.score_report().speed_percent, 100);

        session.state.tick_interval_ms = 110;
        assert_eq!(session.score_report().speed_percent, 200);
    }

    #[test]
    fn test_snapshot_reflects_round() {
        let mut session = running_session(LevelId::Easy);
        session.tick();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, Phase::Running);
        assert_eq!(snapshot.tile_count, session.state().grid.tile_count());
        assert!(snapshot.snakes[0].body.len() >= 2);
        assert_eq!(snapshot.game_over_message, None);
    }

    #[test]
    fn test_same_seed_same_round() {
        let mut a = GameSession::new(LevelId::Medium, 424242);
        let mut b = GameSession::new(LevelId::Medium, 424242);
        a.start();
        b.start();

        for step in 0..40 {
            if step % 5 == 0 {
                a.steer(PlayerSlot::P1, Direction::Down);
                b.steer(PlayerSlot::P1, Direction::Down);
            }
            if step % 5 == 2 {
                a.steer(PlayerSlot::P1, Direction::Right);
                b.steer(PlayerSlot::P1, Direction::Right);
            }
            let oa = a.tick();
            let ob = b.tick();
            assert_eq!(oa, ob);
            if oa != TickOutcome::Continue {
                break;
            }
        }
        assert_eq!(*a.state(), *b.state());
    }
}
