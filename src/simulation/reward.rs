//! Reward shaping for the learning environment
//!
//! Every tick pays for congestion and earns for service. The tick on which
//! an approach is opened additionally scores that choice against the queues
//! as they stand after the transition.

use super::config::RewardConfig;
use super::types::{Direction, DIRECTION_COUNT};

/// Reward for one tick.
///
/// `opened` is the approach that received green on this tick, if any.
pub fn shape(
    config: &RewardConfig,
    counts: [u32; DIRECTION_COUNT],
    served: u32,
    opened: Option<Direction>,
) -> f64 {
    let total: u32 = counts.iter().sum();
    let mut reward =
        -(f64::from(total) * config.congestion_weight) + f64::from(served) * config.service_weight;

    if let Some(chosen) = opened {
        reward += decision_bonus(config, counts, chosen);
    }
    reward
}

/// Shaping terms applied only when an approach is opened
pub fn decision_bonus(
    config: &RewardConfig,
    counts: [u32; DIRECTION_COUNT],
    chosen: Direction,
) -> f64 {
    let chosen_count = counts[chosen.index()];
    let max_count = counts.iter().copied().max().unwrap_or(0);
    let total: u32 = counts.iter().sum();
    let mean = f64::from(total) / DIRECTION_COUNT as f64;
    let imbalance = f64::from(max_count) - mean;
    let matches_max = chosen_count == max_count;

    let mut bonus = 0.0;
    if matches_max && max_count > 0 {
        bonus += config.match_bonus;
    }
    if chosen_count == 0 && total > 0 {
        bonus -= config.empty_penalty;
    }
    if imbalance > config.imbalance_threshold {
        bonus -= config.imbalance_penalty * imbalance;
        if matches_max {
            bonus += config.imbalance_resolved_bonus;
        }
    }
    bonus
}
