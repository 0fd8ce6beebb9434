//! Error types for the intersection simulation.

use thiserror::Error;

/// A timing or environment parameter failed validation.
///
/// Raised at construction; no simulation instance exists afterwards.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// An integer parameter that must be strictly positive was zero.
    #[error("configuration value `{name}` must be greater than zero")]
    NonPositive { name: &'static str },

    /// A rate parameter was zero, negative, NaN or infinite.
    #[error("configuration value `{name}` must be a finite positive number, got {value}")]
    InvalidRate { name: &'static str, value: f64 },
}

/// A caller named a direction outside N, E, S, W.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown direction `{0}`, expected one of N, E, S, W")]
pub struct InvalidDirection(pub String);

/// The external decision agent could not produce an action.
///
/// Never fatal: the caller falls back to the heuristic for that decision.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    /// No model is loaded or the agent is not ready yet.
    #[error("decision agent unavailable")]
    Unavailable,

    /// The agent was asked but failed.
    #[error("decision agent failed: {0}")]
    Failed(String),
}
