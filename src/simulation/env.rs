//! Learning environment adapter
//!
//! Exposes the intersection as `reset() -> state` and
//! `step(action) -> (state, reward, done)`, ticking as fast as the caller
//! drives it. The action is only consumed when ALLRED ends; every other
//! decision stays with the heuristic.

use log::debug;

use super::agent::{encode_state, StateVector};
use super::arrivals::{ArrivalSource, PoissonArrivals};
use super::config::EnvConfig;
use super::error::ConfigError;
use super::intersection::{Intersection, Snapshot, TickOutcome};
use super::reward;
use super::types::Direction;

/// Result of one environment step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub state: StateVector,
    pub reward: f64,
    pub done: bool,
    /// Raw tick record, for drivers that want more than the reward
    pub outcome: TickOutcome,
}

/// Gym-style wrapper around one `Intersection`
pub struct TrafficEnv {
    config: EnvConfig,
    intersection: Intersection,
    arrivals: Box<dyn ArrivalSource>,
}

impl TrafficEnv {
    /// Environment with Poisson arrivals at `config.arrival_rate`
    pub fn new(config: EnvConfig, seed: Option<u64>) -> Result<Self, ConfigError> {
        let arrivals = PoissonArrivals::new(config.arrival_rate, seed)?;
        Self::with_arrivals(config, Box::new(arrivals))
    }

    /// Environment driven by a caller-supplied arrival source
    pub fn with_arrivals(
        config: EnvConfig,
        arrivals: Box<dyn ArrivalSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            intersection: Intersection::new(config.signal)?,
            config,
            arrivals,
        })
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// Start a new episode, continuing the current random stream
    pub fn reset(&mut self) -> StateVector {
        self.intersection.reset();
        self.state()
    }

    /// Start a new episode with the arrival stream restarted from `seed`
    pub fn reset_with_seed(&mut self, seed: u64) -> StateVector {
        self.arrivals.reseed(seed);
        self.reset()
    }

    /// Advance one tick. `action` in `[0, 4)` names the approach to open if
    /// ALLRED ends on this tick; anything else falls back to round-robin.
    pub fn step(&mut self, action: usize) -> StepResult {
        let outcome = self
            .intersection
            .advance(&mut *self.arrivals, |_, _| Some(action));

        let reward = reward::shape(
            &self.config.reward,
            self.intersection.queues().counts(),
            outcome.service.served,
            outcome.transition.opened(),
        );
        let done = outcome.tick >= self.config.episode_length;
        if done && outcome.tick == self.config.episode_length {
            debug!(
                "Episode finished at t={} with {} vehicles queued",
                outcome.tick,
                self.intersection.queues().total()
            );
        }

        StepResult {
            state: self.state(),
            reward,
            done,
            outcome,
        }
    }

    /// Current encoded state
    pub fn state(&self) -> StateVector {
        encode_state(
            self.intersection.queues().counts(),
            &self.intersection.phase_state(),
        )
    }

    /// Action the heuristic would take from the current state
    pub fn heuristic_action(&self) -> usize {
        self.intersection.heuristic_choice().index()
    }

    /// Inject one vehicle on `direction` at the current tick
    pub fn add_car(&mut self, direction: Direction) {
        self.intersection.add_car(direction);
    }

    pub fn snapshot(&self) -> Snapshot {
        self.intersection.snapshot()
    }

    pub fn is_done(&self) -> bool {
        self.intersection.clock() >= self.config.episode_length
    }
}
