//! Heuristic phase selection
//!
//! Picks the next approach to receive green from the current queues:
//! 1. If another approach is busier by at least the switch threshold, open
//!    the busiest one (oldest head vehicle wins among equals).
//! 2. If the busiest other approach ties the current one, open whichever of
//!    the tied approaches has waited longest, if that is not the current one.
//! 3. Otherwise advance round-robin, so the cycle always makes progress.
//!
//! Remaining ties are broken by the fixed N, E, S, W order.

use super::config::SignalConfig;
use super::error::ConfigError;
use super::queue::QueueState;
use super::types::{Direction, Tick};

/// Chooses the approach that should hold right-of-way next
pub trait PhasePolicy {
    fn choose(&self, queues: &QueueState, current: Direction, now: Tick) -> Direction;
}

/// Deterministic queue-length heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicPolicy {
    switch_threshold: u32,
}

impl HeuristicPolicy {
    /// The threshold must be at least 1, as in `SignalConfig`
    pub fn new(switch_threshold: u32) -> Result<Self, ConfigError> {
        if switch_threshold == 0 {
            return Err(ConfigError::NonPositive {
                name: "switch_threshold",
            });
        }
        Ok(Self { switch_threshold })
    }

    pub fn from_config(config: &SignalConfig) -> Result<Self, ConfigError> {
        Self::new(config.switch_threshold)
    }

    pub fn switch_threshold(&self) -> u32 {
        self.switch_threshold
    }
}

impl PhasePolicy for HeuristicPolicy {
    /// Pure: depends only on the counts, the head arrival ticks, `current`
    /// and `now`. Never returns `current`.
    fn choose(&self, queues: &QueueState, current: Direction, now: Tick) -> Direction {
        let current_count = queues.count(current);
        let others = || Direction::ALL.into_iter().filter(move |&d| d != current);

        let busiest = others().map(|d| queues.count(d)).max().unwrap_or(0);

        if u64::from(busiest) >= u64::from(current_count) + u64::from(self.switch_threshold) {
            let candidates = others().filter(|&d| queues.count(d) == busiest);
            if let Some(chosen) = longest_waiting(candidates, queues, now) {
                return chosen;
            }
        }

        if busiest == current_count {
            let tied = Direction::ALL
                .into_iter()
                .filter(|&d| queues.count(d) == current_count);
            if let Some(chosen) = longest_waiting(tied, queues, now) {
                if chosen != current {
                    return chosen;
                }
            }
        }

        current.next()
    }
}

/// First direction (in iteration order) whose head vehicle has waited
/// strictly longer than every earlier one
fn longest_waiting(
    candidates: impl Iterator<Item = Direction>,
    queues: &QueueState,
    now: Tick,
) -> Option<Direction> {
    let mut best: Option<(Direction, u64)> = None;
    for direction in candidates {
        let wait = queues.oldest_wait(direction, now);
        match best {
            Some((_, best_wait)) if wait <= best_wait => {}
            _ => best = Some((direction, wait)),
        }
    }
    best.map(|(direction, _)| direction)
}
