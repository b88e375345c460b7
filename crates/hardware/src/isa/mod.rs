//! Instruction set definition.
//!
//! This module defines the small RISC-style ISA the simulator executes:
//! 1. **Opcodes:** The opcode taxonomy with classifier predicates used by
//!    every pipeline stage (destination presence, operand usage, functional
//!    unit routing, flag production).
//! 2. **Instructions:** The immutable decoded instruction model.
//! 3. **Assembly:** A parser for the comma-separated program format.

/// Assembly source parsing.
pub mod asm;
/// Decoded instruction model.
pub mod instruction;
/// Opcode taxonomy and classification.
pub mod opcode;

pub use instruction::Instruction;
pub use opcode::{FuKind, Opcode};
