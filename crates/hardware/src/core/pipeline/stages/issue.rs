//! Issue selection.
//!
//! Runs at the top of the execute stage, once per functional unit. A
//! wake-up pass first upgrades any ready bits whose producing physical
//! register has become valid since dispatch (covering broadcasts an entry
//! missed because it was dispatched in the same cycle). Selection then
//! picks, per idle unit, the oldest eligible entry — smallest dispatch
//! cycle, lowest slot index on ties — frees its IQ slot, and starts the
//! unit with the instruction's full latency.

use tracing::trace;

use crate::core::Cpu;
use crate::core::pipeline::Pipeline;
use crate::core::pipeline::fu::FuOp;
use crate::isa::FuKind;

/// Runs wake-up and per-unit selection for one cycle.
pub(crate) fn issue_stage(cpu: &mut Cpu, pl: &mut Pipeline) {
    wake_up(cpu, pl);

    if pl.int_fu.is_idle() {
        if let Some(idx) = select(pl, FuKind::Integer) {
            let latency = pl.int_fu_latency;
            fire(pl, idx, latency);
        }
    }
    if pl.mul_fu.is_idle() {
        if let Some(idx) = select(pl, FuKind::Multiplier) {
            let latency = pl.mul_fu_latency;
            fire(pl, idx, latency);
        }
    }
}

/// Upgrades ready bits against current register-file validity.
fn wake_up(cpu: &Cpu, pl: &mut Pipeline) {
    for e in pl.iq.entries_mut() {
        if !e.allocated {
            continue;
        }
        if !e.rs1.ready {
            if let Some(t) = e.rs1.tag {
                if cpu.prf.is_valid(t) {
                    e.rs1.set(cpu.prf.value(t));
                }
            }
        }
        if !e.rs2.ready {
            if let Some(t) = e.rs2.tag {
                if cpu.prf.is_valid(t) {
                    e.rs2.set(cpu.prf.value(t));
                }
            }
        }
        if !e.zero_flag_ready {
            if let Some(t) = e.zero_flag_src {
                if cpu.prf.is_valid(t) {
                    e.zero_flag_ready = true;
                    e.zero_flag = cpu.prf.zero_flag(t);
                }
            }
        }
    }
}

/// Picks the oldest eligible entry for a functional unit.
fn select(pl: &Pipeline, kind: FuKind) -> Option<usize> {
    let mut best: Option<(u64, usize)> = None;
    for (i, e) in pl.iq.entries().iter().enumerate() {
        if !e.allocated || e.opcode.fu() != kind {
            continue;
        }
        if !e.rs1.ready || !e.rs2.ready {
            continue;
        }
        if e.opcode.tests_zero_flag() && !e.zero_flag_ready {
            continue;
        }
        if best.is_none_or(|(age, _)| e.dispatch_cycle < age) {
            best = Some((e.dispatch_cycle, i));
        }
    }
    best.map(|(_, i)| i)
}

/// Moves an IQ entry into its functional unit.
fn fire(pl: &mut Pipeline, idx: usize, latency: i32) {
    let e = pl.iq.entries()[idx];
    pl.iq.free(idx);
    let robe = pl.rob.entry(e.rob_index);
    let op = FuOp {
        opcode: e.opcode,
        pc: e.pc,
        imm: e.imm,
        rs1_val: e.rs1.value,
        rs2_val: e.rs2.value,
        zero_flag_in: e.zero_flag,
        addr: 0,
        phys_rd: robe.phys_rd,
        rob_index: e.rob_index,
        lsq_index: e.lsq_index,
        cfid: robe.cfid,
    };
    trace!(pc = e.pc, unit = ?e.opcode.fu(), "issue");
    match e.opcode.fu() {
        FuKind::Integer => pl.int_fu.start(op, latency.max(1)),
        FuKind::Multiplier => pl.mul_fu.start(op, latency.max(1)),
    }
}
