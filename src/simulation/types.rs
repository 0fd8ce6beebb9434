//! Core types for the intersection simulation
//!
//! Directions, signal substates and the phase state owned by the scheduler.

use std::fmt;
use std::str::FromStr;

use super::error::InvalidDirection;

/// Number of approaches feeding the intersection
pub const DIRECTION_COUNT: usize = 4;

/// One of the four approaches into the intersection.
///
/// The declaration order is significant: it drives round-robin succession
/// and every tie-break in the decision policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions in their fixed order
    pub const ALL: [Direction; DIRECTION_COUNT] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Position of this direction in the fixed order
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// Map an action index back to a direction, `None` outside `[0, 4)`
    pub fn from_index(index: usize) -> Option<Direction> {
        Self::ALL.get(index).copied()
    }

    /// Round-robin successor: N -> E -> S -> W -> N
    pub fn next(self) -> Direction {
        Self::ALL[(self.index() + 1) % DIRECTION_COUNT]
    }

    /// Single-letter label
    pub fn letter(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::East => 'E',
            Direction::South => 'S',
            Direction::West => 'W',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Direction {
    type Err = InvalidDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Ok(Direction::North),
            "e" | "east" => Ok(Direction::East),
            "s" | "south" => Ok(Direction::South),
            "w" | "west" => Ok(Direction::West),
            _ => Err(InvalidDirection(s.to_string())),
        }
    }
}

/// Sub-status of the signal within one phase cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubState {
    Green,
    Yellow,
    AllRed,
}

impl SubState {
    /// All substates in cycle order
    pub const ALL: [SubState; 3] = [SubState::Green, SubState::Yellow, SubState::AllRed];

    pub fn index(self) -> usize {
        match self {
            SubState::Green => 0,
            SubState::Yellow => 1,
            SubState::AllRed => 2,
        }
    }
}

impl fmt::Display for SubState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SubState::Green => "GREEN",
            SubState::Yellow => "YELLOW",
            SubState::AllRed => "ALLRED",
        };
        f.write_str(label)
    }
}

/// Which approach holds right-of-way, and how far into its cycle it is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseState {
    pub phase: Direction,
    pub sub_state: SubState,
    /// Seconds remaining in the current substate
    pub timer: u32,
}

/// Simulated time, one tick per second
pub type Tick = u64;
