//! Decoded instruction model.
//!
//! An [`Instruction`] is the immutable result of parsing one assembly line:
//! an opcode, the architectural operand slots its format defines, and a
//! literal. Operand slots that a format does not use stay `None`.

use std::fmt;

use super::opcode::Opcode;

/// One decoded instruction. Immutable after parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Instruction {
    /// Operation to perform.
    pub opcode: Opcode,
    /// Destination architectural register, when the format has one.
    pub rd: Option<usize>,
    /// First source architectural register, when the format has one.
    pub rs1: Option<usize>,
    /// Second source architectural register, when the format has one.
    pub rs2: Option<usize>,
    /// Literal operand (also the branch displacement).
    pub imm: i32,
}

impl Instruction {
    /// `MOVC rd, #imm`
    pub const fn movc(rd: usize, imm: i32) -> Self {
        Self {
            opcode: Opcode::Movc,
            rd: Some(rd),
            rs1: None,
            rs2: None,
            imm,
        }
    }

    /// Three-register ALU form: `op rd, rs1, rs2`.
    pub const fn alu(opcode: Opcode, rd: usize, rs1: usize, rs2: usize) -> Self {
        Self {
            opcode,
            rd: Some(rd),
            rs1: Some(rs1),
            rs2: Some(rs2),
            imm: 0,
        }
    }

    /// Register-literal ALU form: `ADDL/SUBL rd, rs1, #imm`.
    pub const fn alu_lit(opcode: Opcode, rd: usize, rs1: usize, imm: i32) -> Self {
        Self {
            opcode,
            rd: Some(rd),
            rs1: Some(rs1),
            rs2: None,
            imm,
        }
    }

    /// `LOAD rd, rs1, #imm`
    pub const fn load(rd: usize, rs1: usize, imm: i32) -> Self {
        Self {
            opcode: Opcode::Load,
            rd: Some(rd),
            rs1: Some(rs1),
            rs2: None,
            imm,
        }
    }

    /// `STORE rs2, rs1, #imm` — stores the value of rs2 at `rs1 + imm`.
    pub const fn store(rs2: usize, rs1: usize, imm: i32) -> Self {
        Self {
            opcode: Opcode::Store,
            rd: None,
            rs1: Some(rs1),
            rs2: Some(rs2),
            imm,
        }
    }

    /// `BZ rs1, #imm` / `BNZ rs1, #imm`
    pub const fn branch(opcode: Opcode, rs1: usize, imm: i32) -> Self {
        Self {
            opcode,
            rd: None,
            rs1: Some(rs1),
            rs2: None,
            imm,
        }
    }

    /// `JUMP rs1, #imm`
    pub const fn jump(rs1: usize, imm: i32) -> Self {
        Self {
            opcode: Opcode::Jump,
            rd: None,
            rs1: Some(rs1),
            rs2: None,
            imm,
        }
    }

    /// `JAL rd, rs1, #imm`
    pub const fn jal(rd: usize, rs1: usize, imm: i32) -> Self {
        Self {
            opcode: Opcode::Jal,
            rd: Some(rd),
            rs1: Some(rs1),
            rs2: None,
            imm,
        }
    }

    /// `NOP`
    pub const fn nop() -> Self {
        Self {
            opcode: Opcode::Nop,
            rd: None,
            rs1: None,
            rs2: None,
            imm: 0,
        }
    }

    /// `HALT`
    pub const fn halt() -> Self {
        Self {
            opcode: Opcode::Halt,
            rd: None,
            rs1: None,
            rs2: None,
            imm: 0,
        }
    }
}

impl fmt::Display for Instruction {
    /// Renders the canonical comma-separated assembly form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        match self.opcode {
            Opcode::Movc => {
                write!(f, ",R{},#{}", self.rd.unwrap_or(0), self.imm)
            }
            Opcode::Add | Opcode::Sub | Opcode::And | Opcode::Or | Opcode::Xor | Opcode::Mul => {
                write!(
                    f,
                    ",R{},R{},R{}",
                    self.rd.unwrap_or(0),
                    self.rs1.unwrap_or(0),
                    self.rs2.unwrap_or(0)
                )
            }
            Opcode::Addl | Opcode::Subl | Opcode::Load | Opcode::Jal => {
                write!(
                    f,
                    ",R{},R{},#{}",
                    self.rd.unwrap_or(0),
                    self.rs1.unwrap_or(0),
                    self.imm
                )
            }
            Opcode::Store => {
                write!(
                    f,
                    ",R{},R{},#{}",
                    self.rs2.unwrap_or(0),
                    self.rs1.unwrap_or(0),
                    self.imm
                )
            }
            Opcode::Jump | Opcode::Bz | Opcode::Bnz => {
                write!(f, ",R{},#{}", self.rs1.unwrap_or(0), self.imm)
            }
            Opcode::Nop | Opcode::Halt => Ok(()),
        }
    }
}
