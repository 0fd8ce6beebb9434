//! Episode driver for the learning environment
//!
//! Runs a `DecisionAgent` against a `TrafficEnv` until the episode ends and
//! summarises the result. Learning itself happens outside this crate; a
//! trainer can wrap its agent in `DecisionAgent` and reuse this loop for
//! evaluation.

use log::{info, warn};

use super::agent::DecisionAgent;
use super::env::TrafficEnv;

/// Totals for one finished episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    pub steps: u64,
    pub total_reward: f64,
    pub served: u64,
    pub average_wait: f64,
    pub final_queue: u32,
    /// Steps where the agent failed and the heuristic action was used
    pub fallbacks: u64,
}

/// Play one episode from a fresh reset.
///
/// The agent is asked for an action every step, as a learner would be;
/// the environment only acts on it when ALLRED ends. Without an agent the
/// heuristic plays.
pub fn run_episode<'a>(
    env: &mut TrafficEnv,
    mut agent: Option<&mut (dyn DecisionAgent + 'a)>,
    seed: Option<u64>,
) -> EpisodeSummary {
    let mut state = match seed {
        Some(seed) => env.reset_with_seed(seed),
        None => env.reset(),
    };

    let mut steps = 0;
    let mut total_reward = 0.0;
    let mut fallbacks = 0;

    loop {
        let action = match agent.as_deref_mut() {
            None => env.heuristic_action(),
            Some(agent) => match agent.act(&state) {
                Ok(action) => action,
                Err(err) => {
                    if fallbacks == 0 {
                        warn!("Agent {} failed ({}); using heuristic actions", agent.name(), err);
                    }
                    fallbacks += 1;
                    env.heuristic_action()
                }
            },
        };

        let result = env.step(action);
        steps += 1;
        total_reward += result.reward;
        state = result.state;

        if result.done {
            break;
        }
    }

    let snapshot = env.snapshot();
    EpisodeSummary {
        steps,
        total_reward,
        served: snapshot.served_count,
        average_wait: snapshot.average_wait,
        final_queue: snapshot.total_queue(),
        fallbacks,
    }
}

/// Play `episodes` episodes and return every summary.
///
/// With a base seed, episode `i` uses `base + i` so a whole evaluation is
/// reproducible.
pub fn evaluate<'a>(
    env: &mut TrafficEnv,
    mut agent: Option<&mut (dyn DecisionAgent + 'a)>,
    episodes: u32,
    base_seed: Option<u64>,
) -> Vec<EpisodeSummary> {
    let mut summaries = Vec::with_capacity(episodes as usize);
    for episode in 0..episodes {
        let seed = base_seed.map(|base| base.wrapping_add(u64::from(episode)));
        let summary = run_episode(env, agent.as_deref_mut(), seed);
        info!(
            "Episode {}/{} | Reward: {:.2} | Served: {} | Avg wait: {:.2}s | Queue left: {}",
            episode + 1,
            episodes,
            summary.total_reward,
            summary.served,
            summary.average_wait,
            summary.final_queue
        );
        summaries.push(summary);
    }
    summaries
}

/// Mean total reward across summaries, 0 for none
pub fn mean_reward(summaries: &[EpisodeSummary]) -> f64 {
    if summaries.is_empty() {
        return 0.0;
    }
    summaries.iter().map(|s| s.total_reward).sum::<f64>() / summaries.len() as f64
}
