//! Configuration system for the simulator.
//!
//! This module defines the structures that parameterize the machine. It
//! provides:
//! 1. **Defaults:** Baseline machine constants (structure capacities,
//!    functional-unit latencies, memory size).
//! 2. **Structures:** Hierarchical config for the core and data memory.
//!
//! Configuration is supplied as JSON (`Config::from_json`) or via
//! `Config::default()`.

use serde::Deserialize;

use crate::common::error::SimError;

/// Default configuration constants for the simulator.
///
/// These values define the baseline machine when not explicitly overridden
/// in a JSON configuration file.
mod defaults {
    /// Number of unified physical registers.
    pub const NUM_PHYS_REGS: usize = 40;

    /// Instruction queue capacity (dispatched instructions awaiting issue).
    pub const IQ_SIZE: usize = 16;

    /// Reorder buffer capacity (in-flight instructions).
    pub const ROB_SIZE: usize = 32;

    /// Load-store queue capacity (in-flight memory operations).
    pub const LSQ_SIZE: usize = 20;

    /// Control-flow queue capacity (outstanding speculative branches).
    pub const CFQ_SIZE: usize = 8;

    /// Maximum instructions retired per cycle.
    pub const COMMIT_WIDTH: usize = 2;

    /// Integer ALU latency in cycles.
    pub const INT_FU_LATENCY: i32 = 1;

    /// Multiplier latency in cycles.
    pub const MUL_FU_LATENCY: i32 = 2;

    /// Memory unit latency in cycles.
    pub const MEM_FU_LATENCY: i32 = 3;

    /// Data memory size in words.
    pub const MEM_SIZE_WORDS: usize = 4000;
}

/// Core sizing and latency parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Number of unified physical registers.
    pub num_phys_regs: usize,
    /// Instruction queue capacity.
    pub iq_size: usize,
    /// Reorder buffer capacity.
    pub rob_size: usize,
    /// Load-store queue capacity.
    pub lsq_size: usize,
    /// Control-flow queue capacity.
    pub cfq_size: usize,
    /// Maximum instructions retired per cycle.
    pub commit_width: usize,
    /// Integer ALU latency in cycles.
    pub int_fu_latency: i32,
    /// Multiplier latency in cycles.
    pub mul_fu_latency: i32,
    /// Memory unit latency in cycles.
    pub mem_fu_latency: i32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            num_phys_regs: defaults::NUM_PHYS_REGS,
            iq_size: defaults::IQ_SIZE,
            rob_size: defaults::ROB_SIZE,
            lsq_size: defaults::LSQ_SIZE,
            cfq_size: defaults::CFQ_SIZE,
            commit_width: defaults::COMMIT_WIDTH,
            int_fu_latency: defaults::INT_FU_LATENCY,
            mul_fu_latency: defaults::MUL_FU_LATENCY,
            mem_fu_latency: defaults::MEM_FU_LATENCY,
        }
    }
}

/// Data memory parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Backing-store size in words; computed addresses index it directly.
    pub size_words: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size_words: defaults::MEM_SIZE_WORDS,
        }
    }
}

/// Root configuration for the simulator.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Core sizing and latencies.
    pub core: CoreConfig,
    /// Data memory parameters.
    pub memory: MemoryConfig,
}

impl Config {
    /// Deserializes a configuration from JSON, with defaults for any
    /// omitted field.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }
}
