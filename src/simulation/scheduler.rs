//! Signal phase state machine
//!
//! Cycles strictly GREEN -> YELLOW -> ALLRED -> GREEN. The served approach
//! only changes on the ALLRED -> GREEN edge, which is also the only point
//! where an external decision can be injected.

use log::{debug, warn};

use super::config::SignalConfig;
use super::error::ConfigError;
use super::policy::{HeuristicPolicy, PhasePolicy};
use super::queue::QueueState;
use super::types::{Direction, PhaseState, SubState, Tick};

/// What the scheduler did on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Timer still running
    Hold,
    /// Green kept for a short grace period to drain the current queue
    GreenExtended { phase: Direction },
    /// Green ended
    ToYellow { phase: Direction },
    /// Yellow ended
    ToAllRed { phase: Direction },
    /// Clearance ended and `to` received right-of-way
    ToGreen { from: Direction, to: Direction },
}

impl Transition {
    /// Approach opened by this tick, if the tick crossed ALLRED -> GREEN
    pub fn opened(&self) -> Option<Direction> {
        match self {
            Transition::ToGreen { to, .. } => Some(*to),
            _ => None,
        }
    }
}

/// Timer-driven owner of the phase state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseScheduler<P = HeuristicPolicy> {
    config: SignalConfig,
    policy: P,
    state: PhaseState,
}

impl PhaseScheduler {
    /// Scheduler driven by the heuristic at `config.switch_threshold`
    pub fn new(config: SignalConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let policy = HeuristicPolicy::from_config(&config)?;
        Self::with_policy(config, policy)
    }
}

impl<P: PhasePolicy> PhaseScheduler<P> {
    /// Fails if any timing in `config` is zero
    pub fn with_policy(config: SignalConfig, policy: P) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            policy,
            state: Self::initial_state(&config),
        })
    }

    fn initial_state(config: &SignalConfig) -> PhaseState {
        PhaseState {
            phase: Direction::North,
            sub_state: SubState::Green,
            timer: config.green_min,
        }
    }

    pub fn reset(&mut self) {
        self.state = Self::initial_state(&self.config);
    }

    pub fn state(&self) -> PhaseState {
        self.state
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Advance the timer by one second and transition if it ran out.
    ///
    /// `allred_exit` is consulted only when ALLRED ends. Returning `None`
    /// defers to the scheduler's policy; returning an index outside `[0, 4)` is
    /// treated as malformed and replaced by the round-robin successor.
    pub fn tick<F>(&mut self, queues: &QueueState, now: Tick, allred_exit: F) -> Transition
    where
        F: FnOnce(&QueueState, PhaseState) -> Option<usize>,
    {
        self.state.timer = self.state.timer.saturating_sub(1);
        if self.state.timer > 0 {
            return Transition::Hold;
        }

        let phase = self.state.phase;
        let transition = match self.state.sub_state {
            SubState::Green => {
                let candidate = self.policy.choose(queues, phase, now);
                if candidate == phase && queues.count(phase) > 0 {
                    self.state.timer = self.config.green_extension();
                    Transition::GreenExtended { phase }
                } else {
                    self.state.sub_state = SubState::Yellow;
                    self.state.timer = self.config.yellow;
                    Transition::ToYellow { phase }
                }
            }
            SubState::Yellow => {
                self.state.sub_state = SubState::AllRed;
                self.state.timer = self.config.all_red;
                Transition::ToAllRed { phase }
            }
            SubState::AllRed => {
                let next = match allred_exit(queues, self.state) {
                    None => self.policy.choose(queues, phase, now),
                    Some(index) => Direction::from_index(index).unwrap_or_else(|| {
                        warn!(
                            "Malformed phase candidate {}; advancing round-robin from {}",
                            index, phase
                        );
                        phase.next()
                    }),
                };
                self.state.phase = next;
                self.state.sub_state = SubState::Green;
                self.state.timer = self.config.green_min;
                Transition::ToGreen {
                    from: phase,
                    to: next,
                }
            }
        };

        debug!("t={} {:?} -> {:?}", now, transition, self.state);
        assert!(self.state.timer > 0, "phase timer must restart above zero");
        transition
    }
}
