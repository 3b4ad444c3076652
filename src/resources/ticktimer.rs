//! Fixed-step clock decoupling simulation ticks from rendered frames.
//!
//! The frame loop feeds wall-clock time in; the timer answers how many
//! simulation ticks are owed. After a stall the answer is capped and the
//! backlog dropped, so the simulation slows down instead of spiralling.

use log::debug;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct TickTimer {
    pub interval: Duration,
    pub max_ticks_per_frame: u32,
    accumulated: Duration,
}

impl TickTimer {
    pub fn new(interval: Duration, max_ticks_per_frame: u32) -> Self {
        Self {
            interval: interval.max(Duration::from_nanos(1)),
            max_ticks_per_frame: max_ticks_per_frame.max(1),
            accumulated: Duration::ZERO,
        }
    }

    /// Add `elapsed` and return the number of ticks to simulate now.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulated += elapsed;
        let due = self.accumulated.as_nanos() / self.interval.as_nanos();
        if due > u128::from(self.max_ticks_per_frame) {
            debug!("dropping {} ticks of backlog", due - u128::from(self.max_ticks_per_frame));
            self.accumulated = Duration::ZERO;
            return self.max_ticks_per_frame;
        }
        let due = due as u32;
        self.accumulated -= self.interval * due;
        due
    }

    /// Time carried over to the next frame.
    pub fn remainder(&self) -> Duration {
        self.accumulated
    }
}
