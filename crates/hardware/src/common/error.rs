//! Error taxonomy for the simulator.
//!
//! Two kinds of failure are surfaced as errors: malformed input programs
//! (the engine is never started) and data-memory accesses outside the
//! backing store (a program or implementation bug, not recoverable).
//! Resource exhaustion inside the pipeline is *not* an error — the
//! dispatch and decode stages stall upstream for a cycle and retry.

use thiserror::Error;

/// Errors produced while loading a program or advancing the simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// A line of the assembly source could not be parsed.
    #[error("parse error at line {line}: {reason}")]
    Parse {
        /// One-based source line number.
        line: usize,
        /// Human-readable cause.
        reason: String,
    },

    /// The program file contained no instructions.
    #[error("program contains no instructions")]
    EmptyProgram,

    /// The program file could not be read.
    #[error("failed to read program: {0}")]
    Io(#[from] std::io::Error),

    /// The simulator configuration could not be deserialized.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A load or store computed an address outside data memory.
    #[error("memory access out of range at pc {pc}: address {addr}")]
    MemoryFault {
        /// Program counter of the faulting memory instruction.
        pc: u32,
        /// The computed byte address.
        addr: i32,
    },
}

impl SimError {
    /// Convenience constructor for parse errors.
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }
}
