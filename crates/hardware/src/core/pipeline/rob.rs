//! Reorder buffer (ROB) for in-order retirement.
//!
//! The ROB is a circular buffer of in-flight instructions. It provides:
//! 1. **Allocation:** Entries are claimed at dispatch in program order.
//! 2. **Completion:** Execute and memory mark entries done out of order.
//! 3. **In-order retirement:** Commit (and the memory stage, for loads and
//!    stores) pops only the head.
//! 4. **Squash support:** Entries in a killed control-flow shadow are
//!    converted to completed bubbles in place, so retirement simply drains
//!    them; occupancy stays contiguous between head and tail.

use crate::isa::Opcode;

/// A single entry in the reorder buffer.
#[derive(Clone, Copy, Debug, Default)]
pub struct RobEntry {
    /// Whether this slot is occupied.
    pub allocated: bool,
    /// Whether the instruction has finished executing.
    pub completed: bool,
    /// Operation (rewritten to NOP when the entry is squashed).
    pub opcode: Opcode,
    /// Program counter of the instruction.
    pub pc: u32,
    /// Architectural destination register, when the instruction has one.
    pub arch_rd: Option<usize>,
    /// Physical destination register, when the instruction has one.
    pub phys_rd: Option<usize>,
    /// Cross-reference into the load-store queue, for memory operations.
    pub lsq_index: Option<usize>,
    /// Control-flow shadow this instruction belongs to.
    pub cfid: Option<usize>,
}

/// Reorder buffer: circular in-order retirement queue.
#[derive(Debug)]
pub struct Rob {
    entries: Vec<RobEntry>,
    head: usize,
    tail: usize,
    count: usize,
}

impl Rob {
    /// Creates an empty ROB with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: vec![RobEntry::default(); capacity],
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    /// The ROB capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Number of occupied entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if no entries are occupied.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns true if every slot is occupied.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.count == self.entries.len()
    }

    /// Index of the oldest entry.
    #[inline]
    pub fn head_index(&self) -> usize {
        self.head
    }

    /// Allocates the tail slot. Returns the entry's index, or `None` when
    /// the ROB is full.
    pub fn allocate(&mut self, entry: RobEntry) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        let idx = self.tail;
        self.entries[idx] = entry;
        self.tail = (self.tail + 1) % self.entries.len();
        self.count += 1;
        Some(idx)
    }

    /// The oldest entry, if any.
    pub fn head(&self) -> Option<&RobEntry> {
        (self.count > 0).then(|| &self.entries[self.head])
    }

    /// Pops the oldest entry, freeing its slot.
    pub fn pop_head(&mut self) -> Option<RobEntry> {
        if self.count == 0 {
            return None;
        }
        let entry = self.entries[self.head];
        self.entries[self.head].allocated = false;
        self.head = (self.head + 1) % self.entries.len();
        self.count -= 1;
        Some(entry)
    }

    /// Read access to one slot.
    #[inline]
    pub fn entry(&self, idx: usize) -> &RobEntry {
        &self.entries[idx]
    }

    /// Write access to one slot.
    #[inline]
    pub fn entry_mut(&mut self, idx: usize) -> &mut RobEntry {
        &mut self.entries[idx]
    }

    /// All slots with their indices, for squash walks and state display.
    pub fn slots(&self) -> impl Iterator<Item = (usize, &RobEntry)> {
        self.entries.iter().enumerate()
    }

    /// Mutable access to every slot, for squash walks.
    pub fn slots_mut(&mut self) -> impl Iterator<Item = (usize, &mut RobEntry)> {
        self.entries.iter_mut().enumerate()
    }

    /// Occupied entries in program order, oldest first.
    pub fn iter_in_order(&self) -> impl Iterator<Item = (usize, &RobEntry)> {
        (0..self.count).map(move |i| {
            let idx = (self.head + i) % self.entries.len();
            (idx, &self.entries[idx])
        })
    }
}
