//! The per-cycle pipeline engine.
//!
//! [`Pipeline`] owns every pipeline structure and sequences the stages
//! exactly once per cycle, in reverse pipeline order so each latch is read
//! before its producer refills it:
//!
//! commit → memory → execute (issue first, then unit advance) → dispatch →
//! decode → fetch
//!
//! Squash happens inside execute; later-running stages observe it the same
//! cycle only through the flushed latches, everything else on the next.

use crate::common::constants::NUM_ARCH_REGS;
use crate::common::error::SimError;
use crate::config::Config;
use crate::core::Cpu;
use crate::isa::Opcode;

use super::fu::FunctionalUnit;
use super::iq::IssueQueue;
use super::latches::Latches;
use super::lsq::Lsq;
use super::rob::Rob;
use super::speculation::Speculation;
use super::stages;

/// The out-of-order pipeline: structures, functional units, and the
/// per-cycle step function.
#[derive(Debug)]
pub struct Pipeline {
    /// Frontend latches and stall flags.
    pub latches: Latches,
    /// Reorder buffer.
    pub rob: Rob,
    /// Instruction queue.
    pub iq: IssueQueue,
    /// Load-store queue.
    pub lsq: Lsq,
    /// Integer ALU.
    pub int_fu: FunctionalUnit,
    /// Multiplier.
    pub mul_fu: FunctionalUnit,
    /// Memory unit.
    pub mem_fu: FunctionalUnit,
    /// Control-flow IDs and checkpoints.
    pub speculation: Speculation,
    /// Set when HALT has retired with an idle memory unit.
    pub halted: bool,
    /// Integer ALU latency in cycles.
    pub int_fu_latency: i32,
    /// Multiplier latency in cycles.
    pub mul_fu_latency: i32,
    /// Memory unit latency in cycles.
    pub mem_fu_latency: i32,
    /// Maximum retirements per cycle.
    pub commit_width: usize,
}

impl Pipeline {
    /// Creates an empty pipeline sized by the configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            latches: Latches::new(),
            rob: Rob::new(config.core.rob_size),
            iq: IssueQueue::new(config.core.iq_size),
            lsq: Lsq::new(config.core.lsq_size),
            int_fu: FunctionalUnit::new(),
            mul_fu: FunctionalUnit::new(),
            mem_fu: FunctionalUnit::new(),
            speculation: Speculation::new(config.core.cfq_size),
            halted: false,
            int_fu_latency: config.core.int_fu_latency,
            mul_fu_latency: config.core.mul_fu_latency,
            mem_fu_latency: config.core.mem_fu_latency,
            commit_width: config.core.commit_width,
        }
    }

    /// Advances the machine by exactly one clock cycle.
    pub fn step(&mut self, cpu: &mut Cpu) -> Result<(), SimError> {
        cpu.cycle += 1;
        cpu.stats.cycles = cpu.cycle;

        stages::commit::commit_stage(cpu, self);
        stages::memory::memory_stage(cpu, self)?;
        stages::execute::execute_stage(cpu, self);
        stages::dispatch::dispatch_stage(cpu, self);
        stages::decode::decode_stage(cpu, self);
        stages::fetch::fetch_stage(cpu, self);
        Ok(())
    }

    /// Whether HALT has retired (with an idle memory unit).
    #[inline]
    pub const fn is_done(&self) -> bool {
        self.halted
    }

    /// Cross-checks the microarchitectural invariants that must hold
    /// between cycles. Intended for tests; returns a description of the
    /// first violation found.
    pub fn validate(&self, cpu: &Cpu) -> Result<(), String> {
        let prf_size = cpu.prf.len();

        // Rename maps point inside the register file. The allocation check
        // covers the architectural registers only: the zero-flag alias may
        // outlive the register freed through its writer's own destination.
        for (r, m) in cpu.frontend.entries().iter().enumerate() {
            if let Some(p) = m {
                if *p >= prf_size {
                    return Err(format!("frontend[{r}] = {p} out of range"));
                }
                if r < NUM_ARCH_REGS && !cpu.prf.entry(*p).allocated {
                    return Err(format!("frontend[{r}] = {p} is unallocated"));
                }
            }
        }
        for (r, m) in cpu.backend.entries().iter().enumerate() {
            if let Some(p) = m {
                if *p >= prf_size {
                    return Err(format!("backend[{r}] = {p} out of range"));
                }
            }
        }

        // ROB occupancy is exactly the contiguous window [head, tail).
        let cap = self.rob.capacity();
        let head = self.rob.head_index();
        for (idx, e) in self.rob.slots() {
            let offset = (idx + cap - head) % cap;
            let in_window = offset < self.rob.len();
            if e.allocated != in_window {
                return Err(format!(
                    "rob[{idx}] allocated={} outside window of {} from head {head}",
                    e.allocated,
                    self.rob.len()
                ));
            }
        }

        // Every stamped control-flow ID is live.
        for (i, e) in self.iq.entries().iter().enumerate() {
            if e.allocated {
                if let Some(c) = e.cfid {
                    if !self.speculation.is_live(c) {
                        return Err(format!("iq[{i}] carries dead cfid {c}"));
                    }
                }
            }
        }

        // At most one functional unit per in-flight ROB entry. A store in
        // the memory unit already retired at hand-off, so its slot index
        // is stale and exempt.
        let active: Vec<usize> = [&self.int_fu, &self.mul_fu, &self.mem_fu]
            .into_iter()
            .filter(|fu| !fu.is_idle() && fu.op.opcode != Opcode::Store)
            .map(|fu| fu.op.rob_index)
            .collect();
        for i in 0..active.len() {
            for j in (i + 1)..active.len() {
                if active[i] == active[j] {
                    return Err(format!(
                        "rob index {} is in two functional units",
                        active[i]
                    ));
                }
            }
        }

        // Memory completion respects FIFO order (squashed bubbles aside).
        let mut pending_seen = false;
        for (idx, e) in self.lsq.iter_in_order() {
            if pending_seen && e.done && e.opcode.is_memory() {
                return Err(format!("lsq[{idx}] completed ahead of an older entry"));
            }
            if !e.done {
                pending_seen = true;
            }
        }

        Ok(())
    }
}
