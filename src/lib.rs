//! Intersection Signal Simulation Library
//!
//! A single-intersection traffic signal simulation with a heuristic phase
//! controller and a step/reset environment for external decision agents.

pub mod simulation;
