//! The pipeline stage functions.
//!
//! One free function per stage, each borrowing the machine state and the
//! pipeline structures. The engine calls them in reverse pipeline order
//! every cycle so that each latch is read before its producer overwrites
//! it; issue selection runs inside the execute stage, before the
//! functional units advance, so freshly broadcast operands cannot issue in
//! the cycle they arrive.

/// Commit stage: in-order retirement from the ROB head.
pub mod commit;
/// Decode/rename stage.
pub mod decode;
/// Dispatch stage: ROB/IQ/LSQ allocation and branch checkpointing.
pub mod dispatch;
/// Execute stage: functional-unit advance, broadcast, branch resolution.
pub mod execute;
/// Fetch stage.
pub mod fetch;
/// Issue selection (run from within execute).
pub mod issue;
/// Memory stage: LSQ head drain through the memory unit.
pub mod memory;
