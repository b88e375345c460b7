//! Architectural state: register files and rename tables.

/// Architectural register file (committed mappings).
pub mod arf;
/// Unified physical register file.
pub mod prf;
/// Frontend and backend rename tables.
pub mod rename;

pub use arf::ArchRegFile;
pub use prf::{PhysRegEntry, PhysRegFile};
pub use rename::RenameTable;
