//! Heartbeat gating for periodic status logging in long-running loops.

use std::time::{Duration, Instant};

/// Interval gate: lets a loop log "still alive" lines without spamming.
pub struct Heartbeat {
    interval: Duration,
    last_beat: Instant,
}

impl Heartbeat {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_beat: Instant::now(),
        }
    }

    /// True when the interval has elapsed since the last beat; records the
    /// beat when it has.
    pub fn tick(&mut self) -> bool {
        if self.last_beat.elapsed() >= self.interval {
            self.last_beat = Instant::now();
            true
        } else {
            false
        }
    }

    /// Push the next beat a full interval away (e.g. after activity that
    /// already produced log output).
    pub fn reset(&mut self) {
        self.last_beat = Instant::now();
    }
}
