//! Decode/rename stage.
//!
//! Looks up the renamed sources of the instruction in the fetch/decode
//! latch, allocates a physical destination register for writers, and
//! forwards the renamed instruction to dispatch. With no free physical
//! register the instruction is held in place, which back-pressures fetch
//! for the cycle. HALT bypasses renaming and parks the stage behind it.

use tracing::trace;

use crate::common::constants::ZERO_FLAG_REG;
use crate::core::Cpu;
use crate::core::pipeline::Pipeline;
use crate::core::pipeline::latches::RenamedInstr;
use crate::isa::Opcode;

/// Executes the decode/rename stage for one cycle.
pub(crate) fn decode_stage(cpu: &mut Cpu, pl: &mut Pipeline) {
    if pl.latches.decode_stalled || pl.latches.dispatch_in.is_some() {
        return;
    }
    let Some(fetched) = pl.latches.decode_in else {
        return;
    };
    let instr = fetched.instr;
    let op = instr.opcode;

    if op == Opcode::Halt {
        pl.latches.decode_in = None;
        pl.latches.dispatch_in = Some(RenamedInstr {
            pc: fetched.pc,
            instr,
            u_rs1: None,
            u_rs2: None,
            zero_flag_src: None,
            phys_rd: None,
        });
        // Nothing decodes past a HALT until it retires or is squashed.
        pl.latches.decode_stalled = true;
        return;
    }

    let u_rs1 = if op.reads_rs1() {
        instr.rs1.and_then(|r| cpu.frontend.get(r))
    } else {
        None
    };
    let u_rs2 = if op.reads_rs2() {
        instr.rs2.and_then(|r| cpu.frontend.get(r))
    } else {
        None
    };
    // Conditional branches locate the flag producer at decode time.
    let zero_flag_src = if op.tests_zero_flag() {
        cpu.frontend.get(ZERO_FLAG_REG)
    } else {
        None
    };

    let mut phys_rd = None;
    if op.has_rd() {
        if let Some(rd) = instr.rd {
            let Some(p) = cpu.prf.allocate() else {
                // No free physical register: hold and retry next cycle.
                cpu.stats.stalls_rename += 1;
                trace!(pc = fetched.pc, "decode stalled: register file exhausted");
                return;
            };
            cpu.frontend.set(rd, p);
            if op.sets_zero_flag() {
                cpu.frontend.set(ZERO_FLAG_REG, p);
            }
            phys_rd = Some(p);
        }
    }

    trace!(pc = fetched.pc, ?phys_rd, "decode");
    pl.latches.decode_in = None;
    pl.latches.dispatch_in = Some(RenamedInstr {
        pc: fetched.pc,
        instr,
        u_rs1,
        u_rs2,
        zero_flag_src,
        phys_rd,
    });
}
