//! Instruction queue (IQ): the unordered pool of dispatched instructions
//! waiting for their operands.
//!
//! Entries carry a tag/ready/value triple per source operand plus a
//! separately tracked zero-flag source for conditional branches. The
//! dispatch cycle serves as the age tag for oldest-first selection; slot
//! position carries no ordering information.

use crate::isa::Opcode;

/// A source operand: the physical register it waits on, whether its value
/// has arrived, and the value itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct Operand {
    /// Producing physical register; `None` when the operand has no
    /// producer (never-written architectural register, which reads 0).
    pub tag: Option<usize>,
    /// Whether the value is available.
    pub ready: bool,
    /// The operand value, once ready.
    pub value: i32,
}

impl Operand {
    /// An operand waiting on `tag`; with no producer it is born ready
    /// with value 0.
    pub const fn pending(tag: Option<usize>) -> Self {
        Self {
            tag,
            ready: tag.is_none(),
            value: 0,
        }
    }

    /// Delivers the operand value.
    #[inline]
    pub const fn set(&mut self, value: i32) {
        self.ready = true;
        self.value = value;
    }
}

/// A single entry in the instruction queue.
#[derive(Clone, Copy, Debug, Default)]
pub struct IqEntry {
    /// Whether this slot is occupied.
    pub allocated: bool,
    /// Cycle the instruction was dispatched; the age tag for selection.
    pub dispatch_cycle: u64,
    /// Program counter of the instruction.
    pub pc: u32,
    /// Operation to perform.
    pub opcode: Opcode,
    /// Literal operand.
    pub imm: i32,
    /// First source operand.
    pub rs1: Operand,
    /// Second source operand.
    pub rs2: Operand,
    /// Physical register producing the zero flag, for BZ/BNZ.
    pub zero_flag_src: Option<usize>,
    /// Whether the zero flag value has arrived.
    pub zero_flag_ready: bool,
    /// The zero flag value, once ready.
    pub zero_flag: bool,
    /// Cross-reference to this instruction's reorder-buffer entry.
    pub rob_index: usize,
    /// Cross-reference to this instruction's load-store-queue entry.
    pub lsq_index: Option<usize>,
    /// Control-flow shadow this instruction belongs to.
    pub cfid: Option<usize>,
}

/// Instruction queue: unordered pool with free-slot scan allocation.
#[derive(Debug)]
pub struct IssueQueue {
    entries: Vec<IqEntry>,
}

impl IssueQueue {
    /// Creates an empty queue with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: vec![IqEntry::default(); capacity],
        }
    }

    /// Returns true if no slot is free.
    pub fn is_full(&self) -> bool {
        self.entries.iter().all(|e| e.allocated)
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.allocated).count()
    }

    /// Returns true if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Places an entry in the lowest free slot. Returns the slot index, or
    /// `None` when the queue is full.
    pub fn insert(&mut self, entry: IqEntry) -> Option<usize> {
        let idx = self.entries.iter().position(|e| !e.allocated)?;
        self.entries[idx] = entry;
        Some(idx)
    }

    /// Frees a slot.
    #[inline]
    pub fn free(&mut self, idx: usize) {
        self.entries[idx].allocated = false;
    }

    /// Read access to all slots.
    #[inline]
    pub fn entries(&self) -> &[IqEntry] {
        &self.entries
    }

    /// Write access to all slots (wake-up, broadcast, squash).
    #[inline]
    pub fn entries_mut(&mut self) -> &mut [IqEntry] {
        &mut self.entries
    }
}
