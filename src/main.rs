//! Snake Duel entry point.
//!
//! Runs a self-playing demo round in the terminal: two random-walk pilots
//! stand in for the keyboards, the board is redrawn after every tick, and
//! the final snapshot is dumped as JSON when the round ends.
//!
//! Usage: `snake-duel [easy|medium|hard]` (default: medium).

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use log::{info, warn};
use rand::Rng;

use snake_duel::scheduler::{Event, ThreadTicker};
use snake_duel::session::GameSession;
use snake_duel::sim::{Direction, LevelId, PlayerSlot, TickOutcome};
use snake_duel::view::{Renderer, ScoreReport, ScoreboardSink, Snapshot};

/// Prints the board as one character per tile.
struct AsciiRenderer;

impl Renderer for AsciiRenderer {
    fn render(&mut self, snapshot: &Snapshot) {
        let n = snapshot.tile_count as usize;
        let mut rows = vec![vec!['.'; n]; n];

        // Regrids can leave entities out of bounds; skip those tiles.
        let mut put = |x: i32, y: i32, ch: char| {
            if x >= 0 && y >= 0 && (x as usize) < n && (y as usize) < n {
                rows[y as usize][x as usize] = ch;
            }
        };
        for food in &snapshot.foods {
            put(food.x, food.y, '*');
        }
        for obstacle in &snapshot.obstacles {
            put(obstacle.pos.x, obstacle.pos.y, 'x');
        }
        for (i, snake) in snapshot.snakes.iter().enumerate() {
            let ch = if i == 0 { '1' } else { '2' };
            for seg in &snake.body {
                put(seg.x, seg.y, ch);
            }
        }

        println!(
            "\n{} x {} tiles ({} px cells)",
            snapshot.tile_count, snapshot.tile_count, snapshot.cell_size
        );
        for row in rows {
            println!("{}", row.into_iter().collect::<String>());
        }
        if let Some(message) = &snapshot.game_over_message {
            println!("GAME OVER - {message}");
        }
    }
}

/// Publishes score updates through the log.
struct LogScoreboard;

impl ScoreboardSink for LogScoreboard {
    fn publish(&mut self, report: &ScoreReport) {
        info!(
            "scores P1 {} / P2 {}, best {}, speed {}%",
            report.scores[0], report.scores[1], report.high_score, report.speed_percent
        );
    }
}

/// Random-walk pilots: each cycle, maybe nudge each snake sideways.
fn spawn_pilots(tx: mpsc::Sender<Event>) {
    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            thread::sleep(Duration::from_millis(90));
            for player in PlayerSlot::BOTH {
                if rng.random_bool(0.4) {
                    let direction = match rng.random_range(0..4) {
                        0 => Direction::Up,
                        1 => Direction::Down,
                        2 => Direction::Left,
                        _ => Direction::Right,
                    };
                    if tx.send(Event::Steer { player, direction }).is_err() {
                        return;
                    }
                }
            }
        }
    });
}

fn main() {
    env_logger::init();

    let level = std::env::args().nth(1).unwrap_or_else(|| "medium".into());
    let mut session = GameSession::with_entropy(LevelId::default());
    if let Err(err) = session.set_level(&level) {
        eprintln!("{err}");
        std::process::exit(2);
    }
    info!("Snake Duel demo starting on {}", session.level().as_str());
    session.start();

    let (tx, rx) = mpsc::channel();
    let ticker = ThreadTicker::spawn(tx.clone());
    ticker.sync(session.timer());
    spawn_pilots(tx);

    let mut renderer = AsciiRenderer;
    let mut scoreboard = LogScoreboard;
    scoreboard.publish(&session.score_report());

    // Single consumer loop: timer fires and steering requests serialize here.
    for event in &rx {
        match event {
            Event::Steer { player, direction } => session.steer(player, direction),
            Event::Tick { epoch } => {
                if !session.timer().accepts(epoch) {
                    continue;
                }
                let outcome = session.tick();
                ticker.sync(session.timer());
                renderer.render(&session.snapshot());
                scoreboard.publish(&session.score_report());
                if let TickOutcome::Ended(_) = outcome {
                    break;
                }
            }
            Event::Quit => break,
        }
    }

    match serde_json::to_string(&session.snapshot()) {
        Ok(json) => info!("final snapshot: {json}"),
        Err(err) => warn!("snapshot serialization failed: {err}"),
    }
    ticker.shutdown();
}
