//! Commit stage.
//!
//! Retires up to the commit width of completed entries from the ROB head
//! each cycle, in strict program order. Retiring a writer publishes its
//! mapping to the architectural register file and backend rename table and
//! frees the physical register the destination previously mapped to.
//! Squash bubbles drain here too, releasing the LSQ slot of any squashed
//! memory operation. HALT retires only once the memory unit is idle, and
//! marks the machine done.

use tracing::{debug, trace};

use crate::common::constants::ZERO_FLAG_REG;
use crate::core::Cpu;
use crate::core::pipeline::Pipeline;
use crate::isa::Opcode;

/// Executes the commit stage for one cycle.
pub(crate) fn commit_stage(cpu: &mut Cpu, pl: &mut Pipeline) {
    for _ in 0..pl.commit_width {
        let Some(head) = pl.rob.head() else {
            break;
        };
        if !head.completed {
            break;
        }
        let entry = *head;

        if entry.opcode == Opcode::Halt {
            if !pl.mem_fu.is_idle() {
                // Let an in-flight store drain before stopping.
                break;
            }
            let _ = pl.rob.pop_head();
            cpu.stats.record_retired(Opcode::Halt);
            pl.halted = true;
            debug!(cycle = cpu.cycle, "HALT retired");
            break;
        }

        if entry.opcode.has_rd() {
            retire_register(
                cpu,
                entry.arch_rd,
                entry.phys_rd,
                entry.opcode.sets_zero_flag(),
            );
        }
        if let Some(li) = entry.lsq_index {
            // Only squashed memory bubbles still hold their LSQ slot here;
            // live loads and stores retired from the memory stage.
            debug_assert_eq!(pl.lsq.head_index(), li);
            let _ = pl.lsq.pop_head();
        }
        let _ = pl.rob.pop_head();

        if entry.opcode == Opcode::Nop {
            trace!(pc = entry.pc, "bubble drained");
        } else {
            cpu.stats.record_retired(entry.opcode);
            trace!(pc = entry.pc, op = %entry.opcode, "commit");
        }
    }
}

/// Publishes a committed destination: architectural map, backend rename
/// table, and release of the previously committed physical register.
///
/// The zero-flag alias is updated as a mapping only — the old flag
/// producer is freed through its own architectural register, never through
/// the alias.
pub(crate) fn retire_register(
    cpu: &mut Cpu,
    arch_rd: Option<usize>,
    phys_rd: Option<usize>,
    sets_flag: bool,
) {
    let (Some(rd), Some(p)) = (arch_rd, phys_rd) else {
        return;
    };
    cpu.arf.set(rd, p);
    if let Some(old) = cpu.backend.get(rd) {
        if old != p {
            cpu.prf.release(old);
        }
    }
    cpu.backend.set(rd, p);
    if sets_flag {
        cpu.backend.set(ZERO_FLAG_REG, p);
    }
}
