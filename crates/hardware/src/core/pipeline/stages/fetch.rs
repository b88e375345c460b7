//! Fetch stage.
//!
//! Pulls the instruction at the PC out of code memory into the
//! fetch/decode latch and advances the PC by one instruction. Fetch never
//! recognizes branches; when a taken branch resolves, the execute stage
//! overwrites the PC and flushes the latch behind it. Running past the end
//! of code parks the stage until a squash redirects it.

use tracing::trace;

use crate::common::constants::INSTRUCTION_SIZE;
use crate::core::Cpu;
use crate::core::pipeline::Pipeline;
use crate::core::pipeline::latches::FetchedInstr;

/// Executes the fetch stage for one cycle.
pub(crate) fn fetch_stage(cpu: &mut Cpu, pl: &mut Pipeline) {
    if pl.latches.fetch_stalled || pl.latches.decode_in.is_some() {
        return;
    }
    let Some(idx) = cpu.code_index(cpu.pc) else {
        // Ran past the last instruction; drain quietly.
        pl.latches.fetch_stalled = true;
        return;
    };
    let instr = cpu.code[idx];
    trace!(pc = cpu.pc, %instr, "fetch");
    pl.latches.decode_in = Some(FetchedInstr { pc: cpu.pc, instr });
    cpu.pc += INSTRUCTION_SIZE;
}
