//! Fixed architectural constants.
//!
//! These values are properties of the instruction set and program format,
//! not of a particular machine configuration; machine sizing (structure
//! capacities, functional-unit latencies) lives in [`crate::config`].

/// Number of programmer-visible architectural registers (R0..R15).
pub const NUM_ARCH_REGS: usize = 16;

/// Rename-table index of the zero-flag pseudo-register.
///
/// Conditional branches locate the producer of the flag they test through
/// this extra rename-table slot, exactly as if the flag were a register.
pub const ZERO_FLAG_REG: usize = NUM_ARCH_REGS;

/// Number of rename-table entries (architectural registers plus the flag).
pub const NUM_RENAME_REGS: usize = NUM_ARCH_REGS + 1;

/// Byte address at which program code begins.
pub const CODE_START_ADDR: u32 = 4000;

/// Size of one instruction in bytes.
pub const INSTRUCTION_SIZE: u32 = 4;
