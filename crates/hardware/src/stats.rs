//! Simulation statistics collection and reporting.
//!
//! This module tracks what the machine did. It provides:
//! 1. **Cycle and IPC:** Total cycles, retired instructions, and derived
//!    instructions-per-cycle.
//! 2. **Instruction mix:** Retired counts by category (ALU, load, store,
//!    control flow).
//! 3. **Speculation:** Taken branches and pipeline squashes.
//! 4. **Stalls:** Rename (no free physical register) and structural
//!    (ROB/IQ/LSQ/control-flow queue full) stall cycles.

use crate::isa::Opcode;

/// Counters updated by the pipeline stages each cycle.
#[derive(Clone, Debug, Default)]
pub struct SimStats {
    /// Total simulator cycles elapsed.
    pub cycles: u64,
    /// Number of instructions retired (squash bubbles excluded).
    pub instructions_retired: u64,

    /// Retired ALU (arithmetic/logic/move) instructions.
    pub inst_alu: u64,
    /// Retired loads.
    pub inst_load: u64,
    /// Retired stores.
    pub inst_store: u64,
    /// Retired control-flow instructions.
    pub inst_branch: u64,

    /// Control-flow instructions that resolved taken.
    pub branches_taken: u64,
    /// Pipeline squashes (each taken branch forces one).
    pub squashes: u64,

    /// Cycles decode stalled for want of a free physical register.
    pub stalls_rename: u64,
    /// Cycles dispatch stalled on a full downstream structure.
    pub stalls_structural: u64,
}

impl SimStats {
    /// Records one retired instruction by category.
    pub fn record_retired(&mut self, opcode: Opcode) {
        self.instructions_retired += 1;
        match opcode {
            Opcode::Load => self.inst_load += 1,
            Opcode::Store => self.inst_store += 1,
            op if op.is_control_flow() => self.inst_branch += 1,
            _ => self.inst_alu += 1,
        }
    }

    /// Prints all statistics sections to stdout.
    pub fn print(&self) {
        let cyc = if self.cycles == 0 { 1 } else { self.cycles };
        let ipc = self.instructions_retired as f64 / cyc as f64;
        println!("==========================================================");
        println!("SIMULATION STATISTICS");
        println!("==========================================================");
        println!("sim_cycles               {}", self.cycles);
        println!("sim_insts                {}", self.instructions_retired);
        println!("sim_ipc                  {ipc:.4}");
        println!("----------------------------------------------------------");
        println!("INSTRUCTION MIX");
        println!("  op.alu                 {}", self.inst_alu);
        println!("  op.load                {}", self.inst_load);
        println!("  op.store               {}", self.inst_store);
        println!("  op.branch              {}", self.inst_branch);
        println!("----------------------------------------------------------");
        println!("SPECULATION");
        println!("  branches.taken         {}", self.branches_taken);
        println!("  squashes               {}", self.squashes);
        println!("----------------------------------------------------------");
        println!("STALLS");
        println!("  stalls.rename          {}", self.stalls_rename);
        println!("  stalls.structural      {}", self.stalls_structural);
        println!("==========================================================");
    }
}
