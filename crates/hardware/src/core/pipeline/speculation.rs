//! Speculation tracking: control-flow IDs, the control-flow queue, and
//! per-ID checkpoints.
//!
//! Every control-flow instruction claims a free control-flow ID (cfid) at
//! dispatch and snapshots the physical register file and frontend rename
//! table under that ID. Instructions dispatched afterwards inherit the ID
//! and are speculative relative to the branch. When a branch resolves
//! taken, the checkpoint is restored and every ID from the branch to the
//! queue tail is killed; resolving not-taken just returns the ID.
//!
//! Each ID remembers its parent — the shadow that was current when the
//! branch dispatched — so resolution can hand surviving instructions back
//! to the enclosing shadow instead of leaving stale IDs on them.
//!
//! Results that complete while a checkpoint is live are mirrored into it
//! (`record_completion`), so a later restore cannot lose values produced
//! by instructions older than the restoring branch — including the
//! restoring branch's own link-register write.

use crate::core::arch::{PhysRegFile, RenameTable};

/// Snapshot of renaming state taken at a branch's dispatch.
#[derive(Clone, Debug)]
pub struct Checkpoint {
    /// Copy of the unified register file.
    pub prf: PhysRegFile,
    /// Copy of the frontend rename table.
    pub frontend: RenameTable,
}

/// Control-flow IDs, their checkpoints, and the program-ordered queue of
/// live IDs.
#[derive(Debug)]
pub struct Speculation {
    /// Which IDs are claimed.
    taken: Vec<bool>,
    /// Live IDs in program order, oldest first.
    queue: Vec<usize>,
    /// Checkpoint owned by each claimed ID.
    checkpoints: Vec<Option<Checkpoint>>,
    /// The shadow each claimed ID was dispatched under.
    parent: Vec<Option<usize>>,
    /// The shadow newly dispatched instructions belong to.
    current: Option<usize>,
}

impl Speculation {
    /// Creates speculation state with `capacity` control-flow IDs.
    pub fn new(capacity: usize) -> Self {
        Self {
            taken: vec![false; capacity],
            queue: Vec::with_capacity(capacity),
            checkpoints: vec![None; capacity],
            parent: vec![None; capacity],
            current: None,
        }
    }

    /// Whether a control-flow ID is available.
    pub fn has_free(&self) -> bool {
        self.taken.iter().any(|t| !t)
    }

    /// The shadow newly dispatched instructions inherit.
    #[inline]
    pub const fn current(&self) -> Option<usize> {
        self.current
    }

    /// Live IDs in program order, oldest first.
    #[inline]
    pub fn live(&self) -> &[usize] {
        &self.queue
    }

    /// Whether an ID is currently live.
    pub fn is_live(&self, cfid: usize) -> bool {
        self.queue.contains(&cfid)
    }

    /// Claims a free ID for a newly dispatched branch: snapshots the given
    /// state under it, appends it to the queue tail, and makes it current.
    /// Returns `None` when every ID is claimed.
    pub fn allocate(&mut self, prf: &PhysRegFile, frontend: &RenameTable) -> Option<usize> {
        let cfid = self.taken.iter().position(|t| !t)?;
        self.taken[cfid] = true;
        self.checkpoints[cfid] = Some(Checkpoint {
            prf: prf.clone(),
            frontend: frontend.clone(),
        });
        self.parent[cfid] = self.current;
        self.queue.push(cfid);
        self.current = Some(cfid);
        Some(cfid)
    }

    /// Mirrors a completed result into every live checkpoint, keeping them
    /// coherent with results older than any restore that may use them.
    pub fn record_completion(&mut self, phys: usize, value: i32, zero_flag: bool) {
        for &cfid in &self.queue {
            if let Some(ckpt) = self.checkpoints[cfid].as_mut() {
                ckpt.prf.write(phys, value, zero_flag);
            }
        }
    }

    /// Resolves a branch not-taken: its ID returns to the free list and
    /// leaves the queue; no state is restored. Surviving children of the
    /// ID are re-parented to its own parent, which is returned so the
    /// caller can re-stamp in-flight instructions the same way.
    pub fn resolve_not_taken(&mut self, cfid: usize) -> Option<usize> {
        let parent = self.parent[cfid];
        self.queue.retain(|&c| c != cfid);
        self.taken[cfid] = false;
        self.checkpoints[cfid] = None;
        self.parent[cfid] = None;
        for d in 0..self.parent.len() {
            if self.taken[d] && self.parent[d] == Some(cfid) {
                self.parent[d] = parent;
            }
        }
        if self.current == Some(cfid) {
            self.current = parent;
        }
        parent
    }

    /// Resolves a branch taken: removes `cfid` and everything younger from
    /// the queue, freeing each ID, and returns the branch's own checkpoint
    /// together with the killed IDs in program order. The current shadow
    /// falls back to the branch's parent. Returns `None` if the ID is not
    /// live.
    pub fn resolve_taken(&mut self, cfid: usize) -> Option<(Checkpoint, Vec<usize>)> {
        let pos = self.queue.iter().position(|&c| c == cfid)?;
        let parent = self.parent[cfid];
        let killed: Vec<usize> = self.queue.split_off(pos);
        let mut checkpoint = None;
        for &c in &killed {
            self.taken[c] = false;
            self.parent[c] = None;
            let ckpt = self.checkpoints[c].take();
            if c == cfid {
                checkpoint = ckpt;
            }
        }
        self.current = parent;
        checkpoint.map(|ck| (ck, killed))
    }
}
