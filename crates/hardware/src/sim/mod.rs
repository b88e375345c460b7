//! Simulation: the top-level [`simulator::Simulator`] and program loader.

/// Program file loading.
pub mod loader;
/// Top-level simulator.
pub mod simulator;

pub use simulator::Simulator;
