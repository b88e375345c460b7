//! Architectural register file.
//!
//! The programmer-visible registers. Each entry records which physical
//! register holds the committed value; the value itself lives in the
//! unified register file.

use crate::common::constants::NUM_ARCH_REGS;

use super::prf::PhysRegFile;

/// The architectural register file: committed physical mappings.
#[derive(Clone, Debug)]
pub struct ArchRegFile {
    map: [Option<usize>; NUM_ARCH_REGS],
}

impl Default for ArchRegFile {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchRegFile {
    /// Creates a file with no committed mappings (all registers read 0).
    pub const fn new() -> Self {
        Self {
            map: [None; NUM_ARCH_REGS],
        }
    }

    /// Points an architectural register at its newly committed value.
    #[inline]
    pub fn set(&mut self, arch: usize, phys: usize) {
        self.map[arch] = Some(phys);
    }

    /// The physical register holding the committed value, if any.
    #[inline]
    pub fn get(&self, arch: usize) -> Option<usize> {
        self.map[arch]
    }

    /// The committed value of an architectural register; 0 before its
    /// first commit.
    pub fn value(&self, arch: usize, prf: &PhysRegFile) -> i32 {
        self.map[arch].map_or(0, |p| prf.value(p))
    }

    /// Committed values of all architectural registers.
    pub fn values(&self, prf: &PhysRegFile) -> [i32; NUM_ARCH_REGS] {
        let mut out = [0; NUM_ARCH_REGS];
        for (r, slot) in out.iter_mut().enumerate() {
            *slot = self.value(r, prf);
        }
        out
    }
}
