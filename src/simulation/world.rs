//! Interactive simulation instance
//!
//! The owned, self-contained counterpart of the learning environment: one
//! intersection, optional background traffic and an optional external
//! decision agent that is consulted whenever the clearance interval ends.
//! Nothing here is global; callers own the instance and drive it one tick
//! at a time.

use log::{debug, warn};

use super::agent::{encode_state, DecisionAgent};
use super::arrivals::{no_arrivals, ArrivalSource, PoissonArrivals};
use super::config::SignalConfig;
use super::error::{ConfigError, InvalidDirection};
use super::intersection::{Intersection, Snapshot, TickOutcome};
use super::types::{Direction, Tick};

/// A single intersection simulation
pub struct Simulation {
    intersection: Intersection,

    /// Background traffic, if any. Without it vehicles only appear
    /// through `add_car`.
    arrivals: Option<Box<dyn ArrivalSource>>,

    /// External decision agent consulted at ALLRED -> GREEN
    agent: Option<Box<dyn DecisionAgent>>,

    /// Decisions where the agent failed and the heuristic stood in
    agent_fallbacks: u64,
}

impl Simulation {
    pub fn new(config: SignalConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            intersection: Intersection::new(config)?,
            arrivals: None,
            agent: None,
            agent_fallbacks: 0,
        })
    }

    /// Add Poisson background traffic, seeded for reproducible runs
    pub fn with_random_arrivals(self, rate: f64, seed: Option<u64>) -> Result<Self, ConfigError> {
        let arrivals = PoissonArrivals::new(rate, seed)?;
        Ok(self.with_arrivals(Box::new(arrivals)))
    }

    pub fn with_arrivals(mut self, arrivals: Box<dyn ArrivalSource>) -> Self {
        self.arrivals = Some(arrivals);
        self
    }

    pub fn with_agent(mut self, agent: Box<dyn DecisionAgent>) -> Self {
        self.agent = Some(agent);
        self
    }

    pub fn set_agent(&mut self, agent: Option<Box<dyn DecisionAgent>>) {
        self.agent = agent;
    }

    pub fn config(&self) -> &SignalConfig {
        self.intersection.config()
    }

    pub fn clock(&self) -> Tick {
        self.intersection.clock()
    }

    pub fn agent_fallbacks(&self) -> u64 {
        self.agent_fallbacks
    }

    /// Queue one vehicle on `direction` at the current tick
    pub fn add_car(&mut self, direction: Direction) {
        self.intersection.add_car(direction);
    }

    /// Queue one vehicle on a direction given by name
    pub fn add_car_named(&mut self, name: &str) -> Result<Direction, InvalidDirection> {
        let direction = name.parse()?;
        self.add_car(direction);
        Ok(direction)
    }

    /// Return to the initial state: empty queues, phase N green, tick 0.
    /// The arrival source and agent stay attached.
    pub fn reset(&mut self) {
        self.intersection.reset();
        self.agent_fallbacks = 0;
    }

    /// Run one full tick
    pub fn tick(&mut self) -> TickOutcome {
        let mut idle = no_arrivals;
        let arrivals: &mut dyn ArrivalSource = match self.arrivals.as_mut() {
            Some(source) => &mut **source,
            None => &mut idle,
        };

        let agent = &mut self.agent;
        let fallbacks = &mut self.agent_fallbacks;
        let outcome = self.intersection.advance(arrivals, |queues, state| {
            let agent = agent.as_mut()?;
            let encoded = encode_state(queues.counts(), &state);
            match agent.act(&encoded) {
                Ok(action) => {
                    debug!("Agent {} chose action {}", agent.name(), action);
                    Some(action)
                }
                Err(err) => {
                    warn!(
                        "Agent {} failed ({}); using heuristic for this decision",
                        agent.name(),
                        err
                    );
                    *fallbacks += 1;
                    None
                }
            }
        });

        if let Some(direction) = outcome.transition.opened() {
            debug!("t={} green for {}", outcome.tick, direction);
        }
        outcome
    }

    /// Run `ticks` ticks back to back
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.intersection.snapshot()
    }

    /// Print a summary of the intersection state
    pub fn print_summary(&self) {
        let snapshot = self.snapshot();
        println!("=== Intersection Summary ===");
        println!("Tick: {}", snapshot.tick);
        println!(
            "Signal: {} {} ({}s left)",
            snapshot.phase, snapshot.sub_state, snapshot.timer
        );
        println!("--- Queues ---");
        for direction in Direction::ALL {
            println!(
                "  {}: {} waiting, head wait {}s",
                direction,
                snapshot.count(direction),
                snapshot.wait(direction)
            );
        }
        println!("Served: {}", snapshot.served_count);
        println!("Average wait: {:.2}s", snapshot.average_wait);
        if let Some(agent) = &self.agent {
            println!(
                "Agent: {} ({} heuristic fallbacks)",
                agent.name(),
                self.agent_fallbacks
            );
        }
    }
}
