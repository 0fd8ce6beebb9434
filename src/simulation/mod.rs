//! Single-intersection traffic signal simulation
//!
//! This module contains the discrete-time engine (queues, the phase state
//! machine, the heuristic phase policy) and the two front-ends built on it:
//! the interactive `Simulation` and the `TrafficEnv` learning environment.

mod agent;
mod arrivals;
mod config;
mod env;
mod episode;
mod error;
mod intersection;
mod metrics;
mod policy;
mod queue;
mod reward;
mod scheduler;
mod types;
mod world;

pub use agent::{
    decode_counts, decode_phase, decode_sub_state, encode_state, DecisionAgent,
    LongestQueueAgent, RoundRobinAgent, StateVector, ACTION_COUNT, STATE_SIZE,
};
pub use arrivals::{no_arrivals, ArrivalSource, PoissonArrivals};
pub use config::{
    EnvConfig, RewardConfig, SignalConfig, DEFAULT_ALL_RED, DEFAULT_ARRIVAL_RATE,
    DEFAULT_EPISODE_LENGTH, DEFAULT_GREEN_MIN, DEFAULT_SERVICE_RATE, DEFAULT_SWITCH_THRESHOLD,
    DEFAULT_YELLOW,
};
pub use env::{StepResult, TrafficEnv};
pub use episode::{evaluate, mean_reward, run_episode, EpisodeSummary};
pub use error::{AgentError, ConfigError, InvalidDirection};
pub use intersection::{Intersection, Snapshot, TickOutcome};
pub use metrics::Metrics;
pub use policy::{HeuristicPolicy, PhasePolicy};
pub use queue::{QueueState, ServeOutcome};
pub use reward::{decision_bonus, shape as shape_reward};
pub use scheduler::{PhaseScheduler, Transition};
pub use types::{Direction, PhaseState, SubState, Tick, DIRECTION_COUNT};
pub use world::Simulation;
