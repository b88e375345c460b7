//! Dispatch stage.
//!
//! Allocates the downstream entries for the renamed instruction in the
//! decode/dispatch latch, in a fixed order: the LSQ slot for memory
//! operations, then the ROB entry, then the IQ entry (skipped for HALT,
//! whose ROB entry is born completed). Capacity is checked up front for
//! everything the instruction needs, so a stalled dispatch allocates
//! nothing and simply retries next cycle while the latch back-pressures
//! decode and fetch.
//!
//! Control-flow operations additionally claim a control-flow ID, snapshot
//! the register file and frontend rename table under it, stamp their own
//! entries with it, and leave it as the current shadow for everything
//! dispatched after them.

use tracing::trace;

use crate::core::Cpu;
use crate::core::pipeline::Pipeline;
use crate::core::pipeline::iq::{IqEntry, Operand};
use crate::core::pipeline::lsq::LsqEntry;
use crate::core::pipeline::rob::RobEntry;
use crate::isa::Opcode;

/// Executes the dispatch stage for one cycle.
pub(crate) fn dispatch_stage(cpu: &mut Cpu, pl: &mut Pipeline) {
    let Some(ri) = pl.latches.dispatch_in else {
        return;
    };
    let op = ri.instr.opcode;

    if op == Opcode::Nop {
        // Nothing downstream needs a bubble.
        pl.latches.dispatch_in = None;
        return;
    }

    let needs_lsq = op.is_memory();
    let needs_iq = op != Opcode::Halt;
    let needs_cfid = op.is_control_flow();

    // All-or-nothing capacity check: a stalled dispatch allocates nothing.
    if pl.rob.is_full()
        || (needs_lsq && pl.lsq.is_full())
        || (needs_iq && pl.iq.is_full())
        || (needs_cfid && !pl.speculation.has_free())
    {
        cpu.stats.stalls_structural += 1;
        trace!(pc = ri.pc, "dispatch stalled: downstream structure full");
        return;
    }

    let cfid = if needs_cfid {
        pl.speculation.allocate(&cpu.prf, &cpu.frontend)
    } else {
        pl.speculation.current()
    };

    let lsq_index = if needs_lsq {
        let mut data = Operand::pending(ri.u_rs2);
        if let Some(t) = data.tag {
            if cpu.prf.is_valid(t) {
                data.set(cpu.prf.value(t));
            }
        }
        pl.lsq.allocate(LsqEntry {
            allocated: true,
            done: false,
            pc: ri.pc,
            opcode: op,
            addr_valid: false,
            addr: 0,
            data,
            phys_rd: ri.phys_rd,
            rob_index: 0, // patched below, once the ROB slot is known
            cfid,
        })
    } else {
        None
    };

    let Some(rob_index) = pl.rob.allocate(RobEntry {
        allocated: true,
        completed: op == Opcode::Halt, // HALT needs no execution
        opcode: op,
        pc: ri.pc,
        arch_rd: ri.instr.rd,
        phys_rd: ri.phys_rd,
        lsq_index,
        cfid,
    }) else {
        return; // unreachable: capacity was checked above
    };
    if let Some(li) = lsq_index {
        pl.lsq.entry_mut(li).rob_index = rob_index;
    }

    if needs_iq {
        let mut e = IqEntry {
            allocated: true,
            dispatch_cycle: cpu.cycle,
            pc: ri.pc,
            opcode: op,
            imm: ri.instr.imm,
            rs1: Operand::pending(ri.u_rs1),
            rs2: Operand::pending(ri.u_rs2),
            zero_flag_src: ri.zero_flag_src,
            zero_flag_ready: false,
            zero_flag: false,
            rob_index,
            lsq_index,
            cfid,
        };
        // Operands the instruction does not read never wait.
        if !op.reads_rs1() {
            e.rs1.ready = true;
        }
        if !op.reads_rs2() {
            e.rs2.ready = true;
        }
        // Latch whatever the register file already holds.
        if let Some(t) = e.rs1.tag {
            if cpu.prf.is_valid(t) {
                e.rs1.set(cpu.prf.value(t));
            }
        }
        if let Some(t) = e.rs2.tag {
            if cpu.prf.is_valid(t) {
                e.rs2.set(cpu.prf.value(t));
            }
        }
        match e.zero_flag_src {
            // No flag producer in flight: the architectural flag is clear.
            None => e.zero_flag_ready = true,
            Some(t) if cpu.prf.is_valid(t) => {
                e.zero_flag_ready = true;
                e.zero_flag = cpu.prf.zero_flag(t);
            }
            Some(_) => {}
        }
        let _ = pl.iq.insert(e);
    }

    trace!(pc = ri.pc, rob = rob_index, ?cfid, "dispatch");
    pl.latches.dispatch_in = None;
}
