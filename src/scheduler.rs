//! Cancellable periodic tick scheduling.
//!
//! The session owns a logical [`TimerHandle`]; arming or cancelling it bumps
//! an epoch counter. The driver stamps every tick event with the epoch it
//! was scheduled under, so a tick from a cancelled or re-armed timer is
//! rejected at the loop instead of reaching the session. [`ThreadTicker`] is
//! the std driver: one background thread feeding an mpsc channel that the
//! owning thread drains, which keeps timer fire and input handling
//! serialized on a single logical thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::debug;

use crate::sim::{Direction, PlayerSlot};

/// Messages serialized onto the session's event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Periodic tick, stamped with the timer epoch it was scheduled under.
    Tick { epoch: u64 },
    /// Directional intent for one snake.
    Steer {
        player: PlayerSlot,
        direction: Direction,
    },
    /// Shut the loop down.
    Quit,
}

/// Logical handle for the recurring tick task. Owned by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerHandle {
    epoch: u64,
    interval_ms: u64,
    armed: bool,
}

impl TimerHandle {
    /// Arm (or re-arm) the timer. Ticks from earlier arms become stale.
    pub fn arm(&mut self, interval: Duration) {
        self.epoch += 1;
        self.interval_ms = interval.as_millis() as u64;
        self.armed = true;
        debug!("timer armed: {} ms, epoch {}", self.interval_ms, self.epoch);
    }

    /// Cancel. No tick stamped before this call is accepted afterwards.
    pub fn cancel(&mut self) {
        self.epoch += 1;
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Gate for incoming tick events.
    pub fn accepts(&self, epoch: u64) -> bool {
        self.armed && epoch == self.epoch
    }
}

struct TickerShared {
    interval_ms: AtomicU64,
    epoch: AtomicU64,
    stop: AtomicBool,
}

/// Background thread publishing [`Event::Tick`] at the armed cadence.
///
/// Interval and epoch are mirrored from the session's handle with [`sync`];
/// an interval of zero (disarmed handle) idles the thread.
///
/// [`sync`]: ThreadTicker::sync
pub struct ThreadTicker {
    shared: Arc<TickerShared>,
    join: Option<JoinHandle<()>>,
}

impl ThreadTicker {
    pub fn spawn(tx: Sender<Event>) -> Self {
        let shared = Arc::new(TickerShared {
            interval_ms: AtomicU64::new(0),
            epoch: AtomicU64::new(0),
            stop: AtomicBool::new(false),
        });
        let inner = Arc::clone(&shared);
        let join = thread::spawn(move || {
            loop {
                if inner.stop.load(Ordering::Relaxed) {
                    break;
                }
                let interval = inner.interval_ms.load(Ordering::Relaxed);
                if interval == 0 {
                    thread::sleep(Duration::from_millis(10));
                    continue;
                }
                thread::sleep(Duration::from_millis(interval));
                let epoch = inner.epoch.load(Ordering::Relaxed);
                if tx.send(Event::Tick { epoch }).is_err() {
                    break;
                }
            }
        });
        Self {
            shared,
            join: Some(join),
        }
    }

    /// Mirror the session's timer handle into the driver thread.
    pub fn sync(&self, timer: &TimerHandle) {
        self.shared.epoch.store(timer.epoch(), Ordering::Relaxed);
        let ms = if timer.is_armed() {
            timer.interval().as_millis() as u64
        } else {
            0
        };
        self.shared.interval_ms.store(ms, Ordering::Relaxed);
    }

    /// Stop the thread and wait for it to exit.
    pub fn shutdown(mut self) {
        self.shared.stop.store(true, Ordering::Relaxed);
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

impl Drop for ThreadTicker {
    fn drop(&mut self) {
        self.shared.stop.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_handle_rejects_stale_epochs() {
        let mut timer = TimerHandle::default();
        assert!(!timer.accepts(0));

        timer.arm(Duration::from_millis(100));
        let live = timer.epoch();
        assert!(timer.accepts(live));
        assert!(!timer.accepts(live - 1));

        timer.cancel();
        assert!(!timer.accepts(live));
        assert!(!timer.is_armed());

        // Re-arming invalidates everything older.
        timer.arm(Duration::from_millis(50));
        assert!(!timer.accepts(live));
        assert!(timer.accepts(timer.epoch()));
        assert_eq!(timer.interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_ticker_delivers_armed_epoch() {
        let (tx, rx) = mpsc::channel();
        let ticker = ThreadTicker::spawn(tx);

        let mut timer = TimerHandle::default();
        timer.arm(Duration::from_millis(5));
        ticker.sync(&timer);

        let event = rx
            .recv_timeout(Duration::from_secs(2))
            .expect("ticker should fire");
        assert_eq!(event, Event::Tick { epoch: timer.epoch() });

        ticker.shutdown();
    }
}
