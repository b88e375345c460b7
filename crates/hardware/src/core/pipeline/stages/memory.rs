//! Memory stage.
//!
//! Drains the LSQ head through the memory unit, one operation in flight at
//! a time and only when the head's ROB entry has reached the ROB head —
//! memory leaves the machine in strict program order. Stores retire from
//! both queues at hand-off, since nothing can depend on them; loads hold
//! their ROB slot until the data arrives, then write back, broadcast, and
//! perform their own retirement (backend map update included) right here.

use tracing::trace;

use crate::common::error::SimError;
use crate::core::Cpu;
use crate::core::pipeline::Pipeline;
use crate::core::pipeline::fu::FuOp;
use crate::isa::Opcode;

use super::commit::retire_register;
use super::execute::writeback;

/// Executes the memory stage for one cycle.
pub(crate) fn memory_stage(cpu: &mut Cpu, pl: &mut Pipeline) -> Result<(), SimError> {
    if pl.mem_fu.advance() {
        let op = pl.mem_fu.op;
        match op.opcode {
            Opcode::Load => {
                let value = cpu.load(op.pc, op.addr)?;
                trace!(pc = op.pc, addr = op.addr, value, "load complete");
                writeback(cpu, pl, op.phys_rd, value, false);
                // The load retires here; being at the ROB head is what let
                // it reach the memory unit in the first place.
                let head = pl.rob.pop_head();
                debug_assert!(head.is_some_and(|e| e.pc == op.pc));
                let _ = pl.lsq.pop_head();
                if let Some(e) = head {
                    retire_register(cpu, e.arch_rd, e.phys_rd, false);
                    cpu.stats.record_retired(e.opcode);
                }
            }
            Opcode::Store => {
                trace!(pc = op.pc, addr = op.addr, value = op.rs2_val, "store complete");
                cpu.store(op.pc, op.addr, op.rs2_val)?;
            }
            // Squashed while in flight: nothing to finish.
            _ => {}
        }
    } else if pl.mem_fu.is_idle() {
        try_start(cpu, pl);
    }
    Ok(())
}

/// Hands the LSQ head to the memory unit when it is ready.
fn try_start(cpu: &mut Cpu, pl: &mut Pipeline) {
    let rob_head = pl.rob.head_index();
    let rob_empty = pl.rob.is_empty();
    let lsq_head_index = pl.lsq.head_index();

    let Some(head) = pl.lsq.head_mut() else {
        return;
    };
    // A squashed head waits for commit to release it.
    if head.done || !head.addr_valid {
        return;
    }
    // Program order against every other completion: the matching ROB
    // entry must be the oldest instruction in the machine.
    if rob_empty || head.rob_index != rob_head {
        return;
    }
    if head.opcode == Opcode::Store && !head.data.ready {
        // The store's data producer may have completed since dispatch.
        if let Some(t) = head.data.tag {
            if cpu.prf.is_valid(t) {
                head.data.set(cpu.prf.value(t));
            }
        }
        if !head.data.ready {
            return;
        }
    }

    let entry = *head;
    let op = FuOp {
        opcode: entry.opcode,
        pc: entry.pc,
        imm: 0,
        rs1_val: 0,
        rs2_val: entry.data.value,
        zero_flag_in: false,
        addr: entry.addr,
        phys_rd: entry.phys_rd,
        rob_index: entry.rob_index,
        lsq_index: Some(lsq_head_index),
        cfid: entry.cfid,
    };
    // The hand-off cycle counts toward the latency; completion is the
    // decrement to zero, so the countdown must start at one or more.
    pl.mem_fu.start(op, (pl.mem_fu_latency - 1).max(1));
    trace!(pc = entry.pc, addr = entry.addr, op = %entry.opcode, "memory unit start");

    if entry.opcode == Opcode::Store {
        // Nothing depends on a store: it retires at hand-off.
        let _ = pl.lsq.pop_head();
        let popped = pl.rob.pop_head();
        debug_assert!(popped.is_some_and(|e| e.pc == entry.pc));
        cpu.stats.record_retired(Opcode::Store);
    }
}
