//! Execute stage.
//!
//! Runs issue selection first, then advances the integer and multiplier
//! units. A unit whose countdown reaches zero performs its action:
//! arithmetic writes the register file and broadcasts, memory operations
//! deposit their computed address in the LSQ, and control flow resolves —
//! redirecting the PC and squashing the pipeline when taken. The integer
//! unit is advanced before the multiplier so a resolving branch squashes a
//! killed multiply before it can complete in the same cycle.

use tracing::{debug, trace};

use crate::common::constants::INSTRUCTION_SIZE;
use crate::core::Cpu;
use crate::core::pipeline::Pipeline;
use crate::core::pipeline::fu::FuOp;
use crate::isa::Opcode;

use super::issue;

/// Executes the execute stage (issue + both compute units) for one cycle.
pub(crate) fn execute_stage(cpu: &mut Cpu, pl: &mut Pipeline) {
    issue::issue_stage(cpu, pl);

    if pl.int_fu.advance() {
        let op = pl.int_fu.op;
        complete_int(cpu, pl, op);
    }
    if pl.mul_fu.advance() {
        let op = pl.mul_fu.op;
        let value = op.rs1_val.wrapping_mul(op.rs2_val);
        trace!(pc = op.pc, value, "multiplier complete");
        writeback(cpu, pl, op.phys_rd, value, op.opcode.sets_zero_flag());
        pl.rob.entry_mut(op.rob_index).completed = true;
    }
}

/// Handles an integer-unit completion.
fn complete_int(cpu: &mut Cpu, pl: &mut Pipeline, op: FuOp) {
    match op.opcode {
        Opcode::Load | Opcode::Store => {
            // Address computation only; the memory unit does the rest.
            let addr = op.rs1_val.wrapping_add(op.imm);
            trace!(pc = op.pc, addr, "address computed");
            if let Some(li) = op.lsq_index {
                let e = pl.lsq.entry_mut(li);
                e.addr = addr;
                e.addr_valid = true;
            }
        }
        Opcode::Bz | Opcode::Bnz | Opcode::Jump | Opcode::Jal => resolve_branch(cpu, pl, op),
        _ => {
            let value = alu(op.opcode, op.rs1_val, op.rs2_val, op.imm);
            trace!(pc = op.pc, value, "integer complete");
            writeback(cpu, pl, op.phys_rd, value, op.opcode.sets_zero_flag());
            pl.rob.entry_mut(op.rob_index).completed = true;
        }
    }
}

/// Integer ALU semantics.
fn alu(opcode: Opcode, a: i32, b: i32, imm: i32) -> i32 {
    match opcode {
        Opcode::Add => a.wrapping_add(b),
        Opcode::Sub => a.wrapping_sub(b),
        Opcode::And => a & b,
        Opcode::Or => a | b,
        Opcode::Xor => a ^ b,
        Opcode::Addl => a.wrapping_add(imm),
        Opcode::Subl => a.wrapping_sub(imm),
        Opcode::Movc => imm,
        _ => 0,
    }
}

/// Writes a produced value to the register file, mirrors it into live
/// checkpoints, and broadcasts it to every waiting consumer.
pub(crate) fn writeback(
    cpu: &mut Cpu,
    pl: &mut Pipeline,
    phys_rd: Option<usize>,
    value: i32,
    sets_flag: bool,
) {
    let Some(p) = phys_rd else {
        return;
    };
    let zero_flag = sets_flag && value == 0;
    cpu.prf.write(p, value, zero_flag);
    pl.speculation.record_completion(p, value, zero_flag);
    broadcast(pl, p, value, zero_flag);
}

/// Delivers a completed result to IQ operands, IQ zero-flag trackers, and
/// LSQ store-data operands.
fn broadcast(pl: &mut Pipeline, phys: usize, value: i32, zero_flag: bool) {
    for e in pl.iq.entries_mut() {
        if !e.allocated {
            continue;
        }
        if e.rs1.tag == Some(phys) {
            e.rs1.set(value);
        }
        if e.rs2.tag == Some(phys) {
            e.rs2.set(value);
        }
        if e.zero_flag_src == Some(phys) {
            e.zero_flag_ready = true;
            e.zero_flag = zero_flag;
        }
    }
    for e in pl.lsq.entries_mut() {
        if e.allocated && e.data.tag == Some(phys) {
            e.data.set(value);
        }
    }
}

/// Decides a control-flow instruction and redirects on taken.
fn resolve_branch(cpu: &mut Cpu, pl: &mut Pipeline, op: FuOp) {
    let taken = match op.opcode {
        Opcode::Jump | Opcode::Jal => true,
        Opcode::Bz => op.zero_flag_in,
        Opcode::Bnz => !op.zero_flag_in,
        _ => false,
    };

    if op.opcode == Opcode::Jal {
        // The link write survives this branch's own squash through the
        // checkpoint mirror inside writeback.
        let link = (op.pc + INSTRUCTION_SIZE) as i32;
        writeback(cpu, pl, op.phys_rd, link, false);
    }
    pl.rob.entry_mut(op.rob_index).completed = true;

    if taken {
        cpu.stats.branches_taken += 1;
        let target = match op.opcode {
            // The displacement counts from the fall-through address.
            Opcode::Bz | Opcode::Bnz => {
                (op.pc.wrapping_add(INSTRUCTION_SIZE) as i32).wrapping_add(op.imm) as u32
            }
            _ => op.rs1_val.wrapping_add(op.imm) as u32,
        };
        debug!(pc = op.pc, target, op = %op.opcode, "branch taken");
        cpu.pc = target;
        squash(cpu, pl, op.cfid, op.rob_index);
    } else {
        debug!(pc = op.pc, op = %op.opcode, "branch not taken");
        if let Some(c) = op.cfid {
            let parent = pl.speculation.resolve_not_taken(c);
            restamp(pl, c, parent);
        }
    }
}

/// Squash recovery for a taken branch: restore the branch's checkpoint,
/// convert everything in the killed shadows to bubbles, idle any
/// functional unit caught running a killed instruction, and flush the
/// frontend so a fresh fetch stream can start at the new PC.
fn squash(cpu: &mut Cpu, pl: &mut Pipeline, cfid: Option<usize>, own_rob: usize) {
    let Some(c) = cfid else {
        return;
    };
    let Some((ckpt, killed)) = pl.speculation.resolve_taken(c) else {
        return;
    };
    cpu.stats.squashes += 1;
    debug!(cfid = c, killed = killed.len(), "squash");

    // Post-checkpoint register claims all belong to killed instructions,
    // so the restore also returns their physical registers to the pool.
    cpu.prf = ckpt.prf;
    cpu.frontend = ckpt.frontend;

    for d in killed {
        let dead = Some(d);
        for e in pl.iq.entries_mut() {
            if e.allocated && e.cfid == dead {
                e.allocated = false;
            }
        }
        for (idx, e) in pl.rob.slots_mut() {
            if e.allocated && e.cfid == dead && idx != own_rob {
                // Drain as a completed bubble; lsq_index stays so commit
                // can release the matching LSQ slot.
                e.opcode = Opcode::Nop;
                e.completed = true;
            }
        }
        for e in pl.lsq.entries_mut() {
            if e.allocated && e.cfid == dead {
                e.opcode = Opcode::Nop;
                e.done = true;
            }
        }
        if !pl.mul_fu.is_idle() && pl.mul_fu.op.cfid == dead {
            pl.mul_fu.clear();
        }
        if !pl.mem_fu.is_idle() && pl.mem_fu.op.cfid == dead {
            pl.mem_fu.clear();
        }
    }
    pl.latches.flush();
}

/// Hands instructions in a resolved branch's shadow back to the enclosing
/// shadow, so no in-flight entry carries a freed control-flow ID.
fn restamp(pl: &mut Pipeline, old: usize, new: Option<usize>) {
    let old = Some(old);
    for e in pl.iq.entries_mut() {
        if e.allocated && e.cfid == old {
            e.cfid = new;
        }
    }
    for (_, e) in pl.rob.slots_mut() {
        if e.allocated && e.cfid == old {
            e.cfid = new;
        }
    }
    for e in pl.lsq.entries_mut() {
        if e.allocated && e.cfid == old {
            e.cfid = new;
        }
    }
    if !pl.mul_fu.is_idle() && pl.mul_fu.op.cfid == old {
        pl.mul_fu.op.cfid = new;
    }
    if !pl.mem_fu.is_idle() && pl.mem_fu.op.cfid == old {
        pl.mem_fu.op.cfid = new;
    }
}
