//! Cycle-accurate out-of-order superscalar processor simulator library.
//!
//! This crate implements an out-of-order core for a small RISC-style
//! instruction set with the following:
//! 1. **Core:** Register renaming through a unified physical register file,
//!    a reorder buffer for in-order retirement, an instruction queue for
//!    dynamic scheduling, and a load-store queue for memory ordering.
//! 2. **Pipeline:** Fetch, Decode/Rename, Dispatch, Issue, Execute, Memory,
//!    and Commit stages driven by a single per-cycle step function.
//! 3. **Speculation:** Control-flow IDs, rename/register-file checkpoints,
//!    and full pipeline recovery on taken branches.
//! 4. **ISA:** Opcode taxonomy, decoded instruction model, and an assembly
//!    parser for the comma-separated program format.
//! 5. **Simulation:** `Simulator` (owns machine state + pipeline), program
//!    loader, configuration, and statistics.

/// Common types and constants (register counts, code layout, errors).
pub mod common;
/// Simulator configuration (defaults and hierarchical config structures).
pub mod config;
/// Machine core: architectural state and the out-of-order pipeline.
pub mod core;
/// Instruction set (opcodes, decoded instructions, assembly parsing).
pub mod isa;
/// Simulation: `Simulator` and the program loader.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Error type for parsing and simulation failures.
pub use crate::common::error::SimError;
/// Top-level simulator; owns the machine state and pipeline side-by-side.
pub use crate::sim::simulator::Simulator;
