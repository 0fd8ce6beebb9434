//! Per-direction vehicle queues
//!
//! Each approach keeps the arrival tick of every waiting vehicle, oldest
//! first. The queue length is the ledger length, so the vehicle count and
//! the arrival ledger can never disagree.

use std::collections::VecDeque;

use super::types::{Direction, Tick, DIRECTION_COUNT};

/// Result of serving one approach for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeOutcome {
    /// Vehicles that left the queue
    pub served: u32,
    /// Sum of `tick - arrival` over the vehicles that left
    pub wait_sum: u64,
}

/// Vehicle queues for all four approaches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueState {
    arrivals: [VecDeque<Tick>; DIRECTION_COUNT],
}

impl QueueState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one vehicle joining `direction` at `tick`
    pub fn arrive(&mut self, direction: Direction, tick: Tick) {
        let ledger = &mut self.arrivals[direction.index()];
        debug_assert!(
            ledger.back().map_or(true, |&last| last <= tick),
            "arrival ledger must stay ordered oldest first"
        );
        ledger.push_back(tick);
    }

    /// Record `count` vehicles joining `direction` at `tick`
    pub fn arrive_many(&mut self, direction: Direction, tick: Tick, count: u32) {
        for _ in 0..count {
            self.arrive(direction, tick);
        }
    }

    /// Release up to `rate` of the oldest vehicles waiting on `direction`
    pub fn serve(&mut self, direction: Direction, tick: Tick, rate: u32) -> ServeOutcome {
        let ledger = &mut self.arrivals[direction.index()];
        let take = ledger.len().min(rate as usize);
        let wait_sum = ledger
            .drain(..take)
            .map(|arrived| tick.saturating_sub(arrived))
            .sum();
        ServeOutcome {
            served: take as u32,
            wait_sum,
        }
    }

    /// Vehicles waiting on `direction`
    pub fn count(&self, direction: Direction) -> u32 {
        self.arrivals[direction.index()].len() as u32
    }

    /// Counts for all directions in the fixed order
    pub fn counts(&self) -> [u32; DIRECTION_COUNT] {
        Direction::ALL.map(|direction| self.count(direction))
    }

    /// Vehicles waiting across all approaches
    pub fn total(&self) -> u32 {
        self.counts().iter().sum()
    }

    /// Arrival tick of the vehicle at the head of `direction`
    pub fn oldest_arrival(&self, direction: Direction) -> Option<Tick> {
        self.arrivals[direction.index()].front().copied()
    }

    /// How long the head vehicle of `direction` has waited, 0 when empty
    pub fn oldest_wait(&self, direction: Direction, now: Tick) -> u64 {
        self.oldest_arrival(direction)
            .map_or(0, |arrived| now.saturating_sub(arrived))
    }

    /// Oldest waits for all directions in the fixed order
    pub fn oldest_waits(&self, now: Tick) -> [u64; DIRECTION_COUNT] {
        Direction::ALL.map(|direction| self.oldest_wait(direction, now))
    }

    pub fn is_empty(&self) -> bool {
        self.arrivals.iter().all(VecDeque::is_empty)
    }
}
