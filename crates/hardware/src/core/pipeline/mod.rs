//! Pipeline structures and stages.
//!
//! The out-of-order backend is built from integer-indexed, fixed-capacity
//! structures: the reorder buffer, instruction queue, load-store queue,
//! functional units, and the speculation state (control-flow queue plus
//! checkpoints). Cross-references between them are plain indices, never
//! owning pointers. The stage functions live under [`stages`]; the
//! [`engine::Pipeline`] sequences them once per cycle.

/// The per-cycle engine: owns the structures and sequences the stages.
pub mod engine;
/// Functional units with latency countdowns.
pub mod fu;
/// Instruction queue (reservation pool).
pub mod iq;
/// Inter-stage latches for the in-order frontend.
pub mod latches;
/// Load-store queue.
pub mod lsq;
/// Reorder buffer.
pub mod rob;
/// Control-flow IDs, checkpoints, and the control-flow queue.
pub mod speculation;
/// The seven pipeline stage functions.
pub mod stages;

pub use engine::Pipeline;
