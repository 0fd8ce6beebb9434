//! Decision-agent contract
//!
//! An agent maps the 11-field state vector to the index of the approach that
//! should receive the next green. Anything implementing `DecisionAgent` can
//! replace the heuristic at the ALLRED -> GREEN edge; when it fails the
//! caller substitutes the heuristic for that one decision.

use super::error::AgentError;
use super::types::{Direction, PhaseState, SubState, DIRECTION_COUNT};

/// Length of the encoded state
pub const STATE_SIZE: usize = 11;
/// Number of distinct actions
pub const ACTION_COUNT: usize = DIRECTION_COUNT;

/// `[count_N, count_E, count_S, count_W, phase one-hot (N,E,S,W),
/// substate one-hot (GREEN, YELLOW, ALLRED)]`
pub type StateVector = [f32; STATE_SIZE];

/// Encode raw counts and the phase state into the fixed field order
pub fn encode_state(counts: [u32; DIRECTION_COUNT], phase: &PhaseState) -> StateVector {
    let mut state = [0.0; STATE_SIZE];
    for (slot, count) in state.iter_mut().zip(counts) {
        *slot = count as f32;
    }
    state[DIRECTION_COUNT + phase.phase.index()] = 1.0;
    state[2 * DIRECTION_COUNT + phase.sub_state.index()] = 1.0;
    state
}

/// Queue counts stored in a state vector
pub fn decode_counts(state: &StateVector) -> [f32; DIRECTION_COUNT] {
    [state[0], state[1], state[2], state[3]]
}

/// Phase encoded in a state vector, `None` if the one-hot block is blank
pub fn decode_phase(state: &StateVector) -> Option<Direction> {
    Direction::ALL
        .into_iter()
        .find(|d| state[DIRECTION_COUNT + d.index()] > 0.5)
}

/// Substate encoded in a state vector
pub fn decode_sub_state(state: &StateVector) -> Option<SubState> {
    SubState::ALL
        .into_iter()
        .find(|s| state[2 * DIRECTION_COUNT + s.index()] > 0.5)
}

/// External decision-making component
pub trait DecisionAgent {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Pick the next approach to open, as an index in `[0, 4)`
    fn act(&mut self, state: &StateVector) -> Result<usize, AgentError>;
}

impl<A: DecisionAgent + ?Sized> DecisionAgent for Box<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn act(&mut self, state: &StateVector) -> Result<usize, AgentError> {
        (**self).act(state)
    }
}

/// Opens the longest queue; the first approach in order wins ties
#[derive(Debug, Clone, Copy, Default)]
pub struct LongestQueueAgent;

impl DecisionAgent for LongestQueueAgent {
    fn name(&self) -> &str {
        "longest-queue"
    }

    fn act(&mut self, state: &StateVector) -> Result<usize, AgentError> {
        let counts = decode_counts(state);
        let mut best = 0;
        for (index, &count) in counts.iter().enumerate().skip(1) {
            if count > counts[best] {
                best = index;
            }
        }
        Ok(best)
    }
}

/// Opens the successor of the phase encoded in the state
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobinAgent;

impl DecisionAgent for RoundRobinAgent {
    fn name(&self) -> &str {
        "round-robin"
    }

    fn act(&mut self, state: &StateVector) -> Result<usize, AgentError> {
        let phase = decode_phase(state)
            .ok_or_else(|| AgentError::Failed("state has no active phase".to_string()))?;
        Ok(phase.next().index())
    }
}
