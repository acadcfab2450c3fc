//! Countdown tick sources
//!
//! The clock contract is a repeating 1-second callback that supports
//! cancellation. `SecondTimer` is the deterministic form driven by simulation
//! dt; `TimerHandle` wraps a real thread for hosts with a wall clock and
//! guarantees the callback never outlives the handle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Deterministic repeating timer: accumulate dt, report elapsed intervals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecondTimer {
    interval: f32,
    acc: f32,
    cancelled: bool,
}

impl SecondTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            acc: 0.0,
            cancelled: false,
        }
    }

    /// Advance by dt and return how many intervals elapsed. A cancelled
    /// timer never fires again.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if self.cancelled {
            return 0;
        }
        self.acc += dt;
        let mut fires = 0;
        while self.acc >= self.interval {
            self.acc -= self.interval;
            fires += 1;
        }
        fires
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Handle to a repeating background timer thread.
///
/// The callback fires once per interval until `cancel` is called or the
/// handle is dropped, so an orphaned callback can never fire into a round
/// that already ended.
pub struct TimerHandle {
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl TimerHandle {
    /// Spawn a repeating timer firing `callback` every `interval`.
    pub fn spawn_repeating<F>(interval: Duration, callback: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let join = thread::spawn(move || {
            loop {
                thread::sleep(interval);
                if thread_stop.load(Ordering::Acquire) {
                    break;
                }
                callback();
            }
        });
        Self {
            stop,
            join: Some(join),
        }
    }

    /// Stop the timer and wait for the thread to exit. Idempotent.
    pub fn cancel(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_second_timer_fires_per_interval() {
        let mut timer = SecondTimer::new(1.0);
        assert_eq!(timer.advance(0.5), 0);
        assert_eq!(timer.advance(0.5), 1);
        // Large dt catches up with multiple fires
        assert_eq!(timer.advance(2.5), 2);
    }

    #[test]
    fn test_second_timer_cancel() {
        let mut timer = SecondTimer::new(1.0);
        timer.cancel();
        assert_eq!(timer.advance(10.0), 0);
        assert!(timer.is_cancelled());
    }

    #[test]
    fn test_timer_handle_stops_after_cancel() {
        let (tx, rx) = mpsc::channel();
        let mut handle = TimerHandle::spawn_repeating(Duration::from_millis(5), move || {
            let _ = tx.send(());
        });

        // Let it fire at least once
        assert!(rx.recv_timeout(Duration::from_secs(1)).is_ok());
        handle.cancel();

        // Drain anything in flight, then confirm silence
        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }
}
