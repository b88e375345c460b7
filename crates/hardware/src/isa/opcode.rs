//! Opcode taxonomy and classification.
//!
//! All instruction classification is centralized here as predicates on the
//! [`Opcode`] enum so that no pipeline stage ever matches on mnemonic
//! strings. The predicates answer the questions the stages ask: does this
//! instruction write a register, which source operands does it actually
//! read, which functional unit executes it, and does it produce the
//! zero flag that conditional branches test.

use std::fmt;

/// Functional unit an instruction executes on.
///
/// Memory instructions route to the integer unit first for address
/// computation; the dedicated memory unit is fed from the load-store queue
/// rather than from issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FuKind {
    /// Integer ALU: arithmetic, logic, address computation, control flow.
    Integer,
    /// Dedicated multiplier.
    Multiplier,
}

/// Operation performed by an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Opcode {
    /// Register-register add.
    Add,
    /// Register-register subtract.
    Sub,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Bitwise exclusive OR.
    Xor,
    /// Register-register multiply.
    Mul,
    /// Move constant into a register.
    Movc,
    /// Add literal.
    Addl,
    /// Subtract literal.
    Subl,
    /// Load a word from memory.
    Load,
    /// Store a word to memory.
    Store,
    /// Branch if the zero flag is set.
    Bz,
    /// Branch if the zero flag is clear.
    Bnz,
    /// Unconditional register-indirect jump.
    Jump,
    /// Jump and link: register-indirect jump writing the return address.
    Jal,
    /// No operation.
    #[default]
    Nop,
    /// Stop the machine once retired.
    Halt,
}

impl Opcode {
    /// Parses an assembly mnemonic. Mnemonics are upper-case only.
    pub fn from_mnemonic(s: &str) -> Option<Self> {
        Some(match s {
            "ADD" => Self::Add,
            "SUB" => Self::Sub,
            "AND" => Self::And,
            "OR" => Self::Or,
            "XOR" => Self::Xor,
            "MUL" => Self::Mul,
            "MOVC" => Self::Movc,
            "ADDL" => Self::Addl,
            "SUBL" => Self::Subl,
            "LOAD" => Self::Load,
            "STORE" => Self::Store,
            "BZ" => Self::Bz,
            "BNZ" => Self::Bnz,
            "JUMP" => Self::Jump,
            "JAL" => Self::Jal,
            "NOP" => Self::Nop,
            "HALT" => Self::Halt,
            _ => return None,
        })
    }

    /// The assembly mnemonic for this opcode.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Xor => "XOR",
            Self::Mul => "MUL",
            Self::Movc => "MOVC",
            Self::Addl => "ADDL",
            Self::Subl => "SUBL",
            Self::Load => "LOAD",
            Self::Store => "STORE",
            Self::Bz => "BZ",
            Self::Bnz => "BNZ",
            Self::Jump => "JUMP",
            Self::Jal => "JAL",
            Self::Nop => "NOP",
            Self::Halt => "HALT",
        }
    }

    /// Whether this instruction writes an architectural destination register.
    pub const fn has_rd(self) -> bool {
        matches!(
            self,
            Self::Add
                | Self::Sub
                | Self::And
                | Self::Or
                | Self::Xor
                | Self::Mul
                | Self::Movc
                | Self::Addl
                | Self::Subl
                | Self::Load
                | Self::Jal
        )
    }

    /// Whether this instruction reads the value of its first source register.
    ///
    /// Conditional branches carry a register field in the assembly syntax
    /// but test the zero flag, not the register, so they do not wait on it.
    pub const fn reads_rs1(self) -> bool {
        matches!(
            self,
            Self::Add
                | Self::Sub
                | Self::And
                | Self::Or
                | Self::Xor
                | Self::Mul
                | Self::Addl
                | Self::Subl
                | Self::Load
                | Self::Store
                | Self::Jump
                | Self::Jal
        )
    }

    /// Whether this instruction reads the value of its second source register.
    ///
    /// For stores, rs2 holds the data to be written.
    pub const fn reads_rs2(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Sub | Self::And | Self::Or | Self::Xor | Self::Mul | Self::Store
        )
    }

    /// Whether this is a memory operation (occupies a load-store queue slot).
    pub const fn is_memory(self) -> bool {
        matches!(self, Self::Load | Self::Store)
    }

    /// Whether this is a control-flow operation (acquires a control-flow ID).
    pub const fn is_control_flow(self) -> bool {
        matches!(self, Self::Bz | Self::Bnz | Self::Jump | Self::Jal)
    }

    /// Whether this is a conditional branch testing the zero flag.
    pub const fn tests_zero_flag(self) -> bool {
        matches!(self, Self::Bz | Self::Bnz)
    }

    /// Whether this instruction produces the zero flag along with its result.
    ///
    /// Every value-producing ALU op participates, including MOVC (moving the
    /// constant 0 sets the flag); JAL's link address and load data do not.
    pub const fn sets_zero_flag(self) -> bool {
        matches!(
            self,
            Self::Add
                | Self::Sub
                | Self::And
                | Self::Or
                | Self::Xor
                | Self::Mul
                | Self::Movc
                | Self::Addl
                | Self::Subl
        )
    }

    /// The functional unit this instruction issues to.
    pub const fn fu(self) -> FuKind {
        match self {
            Self::Mul => FuKind::Multiplier,
            _ => FuKind::Integer,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
