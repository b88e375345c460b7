//! Machine state container.
//!
//! [`Cpu`] owns everything the pipeline stages read and write outside the
//! pipeline structures themselves: the program counter, code and data
//! memory, the register files, the two rename tables, the cycle counter,
//! and the statistics sink. The pipeline lives beside it in the
//! [`crate::sim::simulator::Simulator`] so that stage functions can borrow
//! both halves at once.

use crate::common::constants::{CODE_START_ADDR, INSTRUCTION_SIZE};
use crate::common::error::SimError;
use crate::config::Config;
use crate::isa::Instruction;
use crate::stats::SimStats;

use super::arch::{ArchRegFile, PhysRegFile, RenameTable};

/// Architectural machine state.
#[derive(Debug)]
pub struct Cpu {
    /// Clock cycles elapsed.
    pub cycle: u64,
    /// Program counter (byte address into code memory).
    pub pc: u32,
    /// The program, one decoded instruction per word.
    pub code: Vec<Instruction>,
    /// Data memory, one word per computed byte address.
    pub memory: Vec<i32>,
    /// Architectural register file (committed mappings).
    pub arf: ArchRegFile,
    /// Unified physical register file.
    pub prf: PhysRegFile,
    /// Frontend (speculative) rename table, read by decode.
    pub frontend: RenameTable,
    /// Backend (committed) rename table, written by commit.
    pub backend: RenameTable,
    /// Statistics sink, updated by every stage.
    pub stats: SimStats,
}

impl Cpu {
    /// Creates machine state for a program under the given configuration.
    pub fn new(code: Vec<Instruction>, config: &Config) -> Self {
        Self {
            cycle: 0,
            pc: CODE_START_ADDR,
            code,
            memory: vec![0; config.memory.size_words],
            arf: ArchRegFile::new(),
            prf: PhysRegFile::new(config.core.num_phys_regs),
            frontend: RenameTable::new(),
            backend: RenameTable::new(),
            stats: SimStats::default(),
        }
    }

    /// Translates a program counter into a code index, or `None` when the
    /// PC is before the code base, misaligned, or past the last instruction.
    pub fn code_index(&self, pc: u32) -> Option<usize> {
        let off = pc.checked_sub(CODE_START_ADDR)?;
        if off % INSTRUCTION_SIZE != 0 {
            return None;
        }
        let idx = (off / INSTRUCTION_SIZE) as usize;
        (idx < self.code.len()).then_some(idx)
    }

    /// Reads a data-memory word.
    pub fn load(&self, pc: u32, addr: i32) -> Result<i32, SimError> {
        let idx = usize::try_from(addr)
            .ok()
            .filter(|&i| i < self.memory.len())
            .ok_or(SimError::MemoryFault { pc, addr })?;
        Ok(self.memory[idx])
    }

    /// Writes a data-memory word.
    pub fn store(&mut self, pc: u32, addr: i32, value: i32) -> Result<(), SimError> {
        let idx = usize::try_from(addr)
            .ok()
            .filter(|&i| i < self.memory.len())
            .ok_or(SimError::MemoryFault { pc, addr })?;
        self.memory[idx] = value;
        Ok(())
    }

    /// Committed value of an architectural register.
    #[inline]
    pub fn arch_value(&self, arch: usize) -> i32 {
        self.arf.value(arch, &self.prf)
    }
}
