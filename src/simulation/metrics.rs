//! Service metrics derived from queue service events

use super::queue::ServeOutcome;

/// Served-vehicle count and accumulated waiting time
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Metrics {
    pub served_count: u64,
    pub total_wait_time: f64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one service event into the totals
    pub fn record(&mut self, outcome: ServeOutcome) {
        self.served_count += u64::from(outcome.served);
        self.total_wait_time += outcome.wait_sum as f64;
    }

    /// Mean wait per served vehicle, 0 before anyone is served
    pub fn average_wait(&self) -> f64 {
        if self.served_count == 0 {
            0.0
        } else {
            self.total_wait_time / self.served_count as f64
        }
    }
}
