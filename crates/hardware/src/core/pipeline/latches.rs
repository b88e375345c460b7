//! Inter-stage latches for the in-order frontend.
//!
//! Two single-entry latches connect fetch → decode → dispatch. A stage
//! consumes its input latch only when it makes progress; an unconsumed
//! latch back-pressures the upstream stage, which is how one-cycle stalls
//! for full structures and an exhausted register file propagate. The
//! stall flags park fetch (PC past the end of code) and decode (a HALT has
//! been forwarded) until a squash redirects the machine.

use crate::isa::Instruction;

/// A fetched instruction on its way to decode.
#[derive(Clone, Copy, Debug)]
pub struct FetchedInstr {
    /// Program counter of the instruction.
    pub pc: u32,
    /// The instruction itself.
    pub instr: Instruction,
}

/// A renamed instruction on its way to dispatch.
#[derive(Clone, Copy, Debug)]
pub struct RenamedInstr {
    /// Program counter of the instruction.
    pub pc: u32,
    /// The instruction itself.
    pub instr: Instruction,
    /// Renamed first source, when the instruction reads one.
    pub u_rs1: Option<usize>,
    /// Renamed second source, when the instruction reads one.
    pub u_rs2: Option<usize>,
    /// Physical register producing the zero flag, for conditional branches.
    pub zero_flag_src: Option<usize>,
    /// Physical register allocated for the destination.
    pub phys_rd: Option<usize>,
}

/// The frontend latches and stall flags.
#[derive(Debug, Default)]
pub struct Latches {
    /// Fetch → decode latch.
    pub decode_in: Option<FetchedInstr>,
    /// Decode → dispatch latch.
    pub dispatch_in: Option<RenamedInstr>,
    /// Fetch has run past the end of code (or a squash has not yet
    /// redirected it).
    pub fetch_stalled: bool,
    /// Decode has forwarded a HALT and parks until squash or the end.
    pub decode_stalled: bool,
}

impl Latches {
    /// Creates empty latches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops everything in flight and un-stalls both stages, so a fresh
    /// fetch stream can resume after a squash.
    pub fn flush(&mut self) {
        self.decode_in = None;
        self.dispatch_in = None;
        self.fetch_stalled = false;
        self.decode_stalled = false;
    }
}
