//! Single-intersection engine
//!
//! One synchronous transition function per tick: arrivals, service on
//! green, the scheduler step and metric updates all happen inside
//! `advance`, so no caller can observe a half-applied tick.

use super::arrivals::ArrivalSource;
use super::config::SignalConfig;
use super::error::ConfigError;
use super::metrics::Metrics;
use super::policy::PhasePolicy;
use super::queue::{QueueState, ServeOutcome};
use super::scheduler::{PhaseScheduler, Transition};
use super::types::{Direction, PhaseState, SubState, Tick, DIRECTION_COUNT};

/// Everything that happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub tick: Tick,
    pub arrivals: [u32; DIRECTION_COUNT],
    /// Approach served this tick, if the light was green
    pub served_direction: Option<Direction>,
    pub service: ServeOutcome,
    pub transition: Transition,
}

/// Read-only view of the intersection between ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub counts: [u32; DIRECTION_COUNT],
    /// Wait of each queue's head vehicle, 0 when empty
    pub waits: [u64; DIRECTION_COUNT],
    pub phase: Direction,
    pub sub_state: SubState,
    pub timer: u32,
    pub tick: Tick,
    pub served_count: u64,
    pub average_wait: f64,
}

impl Snapshot {
    pub fn count(&self, direction: Direction) -> u32 {
        self.counts[direction.index()]
    }

    pub fn wait(&self, direction: Direction) -> u64 {
        self.waits[direction.index()]
    }

    pub fn total_queue(&self) -> u32 {
        self.counts.iter().sum()
    }
}

/// Queues, phase scheduler, metrics and clock of one intersection
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    config: SignalConfig,
    queues: QueueState,
    scheduler: PhaseScheduler,
    metrics: Metrics,
    clock: Tick,
}

impl Intersection {
    pub fn new(config: SignalConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            config,
            queues: QueueState::new(),
            scheduler: PhaseScheduler::new(config)?,
            metrics: Metrics::new(),
            clock: 0,
        })
    }

    /// Empty queues, phase N on a fresh green, clock and metrics at zero
    pub fn reset(&mut self) {
        self.queues = QueueState::new();
        self.scheduler.reset();
        self.metrics = Metrics::new();
        self.clock = 0;
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    pub fn queues(&self) -> &QueueState {
        &self.queues
    }

    pub fn phase_state(&self) -> PhaseState {
        self.scheduler.state()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn clock(&self) -> Tick {
        self.clock
    }

    /// Inject one vehicle on `direction` at the current tick
    pub fn add_car(&mut self, direction: Direction) {
        self.queues.arrive(direction, self.clock);
    }

    /// What the heuristic would open right now
    pub fn heuristic_choice(&self) -> Direction {
        let state = self.scheduler.state();
        self.scheduler
            .policy()
            .choose(&self.queues, state.phase, self.clock)
    }

    /// Run one full tick.
    ///
    /// `allred_exit` sees the queues after this tick's arrivals and service
    /// and is only called when ALLRED ends; see `PhaseScheduler::tick`.
    pub fn advance<F>(&mut self, arrivals: &mut dyn ArrivalSource, allred_exit: F) -> TickOutcome
    where
        F: FnOnce(&QueueState, PhaseState) -> Option<usize>,
    {
        self.clock += 1;
        let now = self.clock;

        let mut arrived = [0; DIRECTION_COUNT];
        for direction in Direction::ALL {
            let count = arrivals.draw(direction);
            self.queues.arrive_many(direction, now, count);
            arrived[direction.index()] = count;
        }

        let state = self.scheduler.state();
        let (served_direction, service) = if state.sub_state == SubState::Green {
            let outcome = self
                .queues
                .serve(state.phase, now, self.config.service_rate);
            self.metrics.record(outcome);
            (Some(state.phase), outcome)
        } else {
            (None, ServeOutcome::default())
        };

        let transition = self.scheduler.tick(&self.queues, now, allred_exit);

        TickOutcome {
            tick: now,
            arrivals: arrived,
            served_direction,
            service,
            transition,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.scheduler.state();
        Snapshot {
            counts: self.queues.counts(),
            waits: self.queues.oldest_waits(self.clock),
            phase: state.phase,
            sub_state: state.sub_state,
            timer: state.timer,
            tick: self.clock,
            served_count: self.metrics.served_count,
            average_wait: self.metrics.average_wait(),
        }
    }
}
