//! Simulator: owns the machine state and the pipeline side-by-side.
//!
//! Keeping the two halves as siblings lets the stage functions borrow the
//! architectural state and the pipeline structures at the same time
//! without interior mutability.

use std::path::Path;

use crate::common::constants::NUM_ARCH_REGS;
use crate::common::error::SimError;
use crate::config::Config;
use crate::core::{Cpu, Pipeline};
use crate::isa::{Instruction, asm};
use crate::sim::loader;

/// Top-level simulator: machine state plus pipeline.
#[derive(Debug)]
pub struct Simulator {
    /// Architectural machine state (registers, memory, rename tables).
    pub cpu: Cpu,
    /// The out-of-order pipeline.
    pub pipeline: Pipeline,
}

impl Simulator {
    /// Loads a program file and builds a simulator for it.
    pub fn new(program: &Path, config: &Config) -> Result<Self, SimError> {
        Ok(Self::with_code(loader::load_program(program)?, config))
    }

    /// Parses assembly source and builds a simulator for it.
    pub fn from_source(src: &str, config: &Config) -> Result<Self, SimError> {
        Ok(Self::with_code(asm::parse_program(src)?, config))
    }

    /// Builds a simulator for already-decoded code.
    pub fn with_code(code: Vec<Instruction>, config: &Config) -> Self {
        Self {
            cpu: Cpu::new(code, config),
            pipeline: Pipeline::new(config),
        }
    }

    /// Advances one clock cycle. Returns true once the machine has halted;
    /// stepping a halted machine is a no-op.
    pub fn step(&mut self) -> Result<bool, SimError> {
        if self.is_done() {
            return Ok(true);
        }
        self.pipeline.step(&mut self.cpu)?;
        Ok(self.is_done())
    }

    /// Advances up to `cycles` clock cycles, stopping early on HALT.
    /// Returns true if the machine halted.
    pub fn run(&mut self, cycles: u64) -> Result<bool, SimError> {
        for _ in 0..cycles {
            if self.step()? {
                return Ok(true);
            }
        }
        Ok(self.is_done())
    }

    /// Whether HALT has retired.
    #[inline]
    pub const fn is_done(&self) -> bool {
        self.pipeline.is_done()
    }

    /// Clock cycles elapsed.
    #[inline]
    pub const fn cycle(&self) -> u64 {
        self.cpu.cycle
    }

    /// Committed value of one architectural register.
    #[inline]
    pub fn arch_reg(&self, r: usize) -> i32 {
        self.cpu.arch_value(r)
    }

    /// Committed values of every architectural register.
    pub fn arch_regs(&self) -> [i32; NUM_ARCH_REGS] {
        self.cpu.arf.values(&self.cpu.prf)
    }

    /// Cross-checks microarchitectural invariants (see
    /// [`Pipeline::validate`]).
    pub fn validate(&self) -> Result<(), String> {
        self.pipeline.validate(&self.cpu)
    }
}
