use std::time::Duration;

use web_time::Instant;

/// Per-turn clock for the human side.
#[derive(Debug, Clone, Copy)]
pub struct TurnTimer {
    started: Instant,
    limit: Duration,
}

impl TurnTimer {
    pub fn start(limit: Duration) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    pub fn restart(&mut self) {
        self.started = Instant::now();
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whole seconds left, counting down once per full elapsed second.
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs_after(self.elapsed())
    }

    pub fn remaining_secs_after(&self, elapsed: Duration) -> u64 {
        self.limit.as_secs().saturating_sub(elapsed.as_secs())
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_after(self.elapsed())
    }

    pub fn is_expired_after(&self, elapsed: Duration) -> bool {
        self.remaining_secs_after(elapsed) == 0
    }
}
