//! Assembly source parsing.
//!
//! One instruction per line, comma-separated tokens: the first token is the
//! mnemonic, register references are written `R<n>` and literals `#<n>`.
//! Blank lines are ignored. Any malformed line aborts the parse with a
//! [`SimError::Parse`] naming the line, so the engine never starts on a
//! bad program.

use crate::common::constants::NUM_ARCH_REGS;
use crate::common::error::SimError;

use super::instruction::Instruction;
use super::opcode::Opcode;

/// Parses a whole program. Fails on the first malformed line, or with
/// [`SimError::EmptyProgram`] if no instructions were found.
pub fn parse_program(src: &str) -> Result<Vec<Instruction>, SimError> {
    let mut code = Vec::new();
    for (idx, line) in src.lines().enumerate() {
        if let Some(instr) = parse_line(line, idx + 1)? {
            code.push(instr);
        }
    }
    if code.is_empty() {
        return Err(SimError::EmptyProgram);
    }
    Ok(code)
}

/// Parses a single line. Returns `Ok(None)` for blank lines.
pub fn parse_line(line: &str, lineno: usize) -> Result<Option<Instruction>, SimError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let tokens: Vec<&str> = line.split(',').map(str::trim).collect();
    let mnemonic = tokens[0];
    let Some(opcode) = Opcode::from_mnemonic(mnemonic) else {
        return Err(SimError::parse(
            lineno,
            format!("unknown opcode `{mnemonic}`"),
        ));
    };
    let operands = &tokens[1..];

    let instr = match opcode {
        Opcode::Movc => {
            let [rd, imm] = expect_operands::<2>(opcode, operands, lineno)?;
            Instruction::movc(register(rd, lineno)?, literal(imm, lineno)?)
        }
        Opcode::Add | Opcode::Sub | Opcode::And | Opcode::Or | Opcode::Xor | Opcode::Mul => {
            let [rd, rs1, rs2] = expect_operands::<3>(opcode, operands, lineno)?;
            Instruction::alu(
                opcode,
                register(rd, lineno)?,
                register(rs1, lineno)?,
                register(rs2, lineno)?,
            )
        }
        Opcode::Addl | Opcode::Subl => {
            let [rd, rs1, imm] = expect_operands::<3>(opcode, operands, lineno)?;
            Instruction::alu_lit(
                opcode,
                register(rd, lineno)?,
                register(rs1, lineno)?,
                literal(imm, lineno)?,
            )
        }
        Opcode::Load => {
            let [rd, rs1, imm] = expect_operands::<3>(opcode, operands, lineno)?;
            Instruction::load(
                register(rd, lineno)?,
                register(rs1, lineno)?,
                literal(imm, lineno)?,
            )
        }
        Opcode::Store => {
            let [rs2, rs1, imm] = expect_operands::<3>(opcode, operands, lineno)?;
            Instruction::store(
                register(rs2, lineno)?,
                register(rs1, lineno)?,
                literal(imm, lineno)?,
            )
        }
        Opcode::Jal => {
            let [rd, rs1, imm] = expect_operands::<3>(opcode, operands, lineno)?;
            Instruction::jal(
                register(rd, lineno)?,
                register(rs1, lineno)?,
                literal(imm, lineno)?,
            )
        }
        Opcode::Jump => {
            let [rs1, imm] = expect_operands::<2>(opcode, operands, lineno)?;
            Instruction::jump(register(rs1, lineno)?, literal(imm, lineno)?)
        }
        Opcode::Bz | Opcode::Bnz => {
            let [rs1, imm] = expect_operands::<2>(opcode, operands, lineno)?;
            Instruction::branch(opcode, register(rs1, lineno)?, literal(imm, lineno)?)
        }
        Opcode::Nop | Opcode::Halt => {
            let [] = expect_operands::<0>(opcode, operands, lineno)?;
            if opcode == Opcode::Nop {
                Instruction::nop()
            } else {
                Instruction::halt()
            }
        }
    };

    Ok(Some(instr))
}

/// Checks the operand count for an opcode's format.
fn expect_operands<'a, const N: usize>(
    opcode: Opcode,
    operands: &[&'a str],
    lineno: usize,
) -> Result<[&'a str; N], SimError> {
    <[&str; N]>::try_from(operands).map_err(|_| {
        SimError::parse(
            lineno,
            format!(
                "{opcode} takes {N} operand(s), found {}",
                operands.len()
            ),
        )
    })
}

/// Parses an `R<n>` register token, checking the architectural range.
fn register(token: &str, lineno: usize) -> Result<usize, SimError> {
    let digits = token
        .strip_prefix('R')
        .ok_or_else(|| SimError::parse(lineno, format!("expected register, found `{token}`")))?;
    let n: usize = digits
        .parse()
        .map_err(|_| SimError::parse(lineno, format!("bad register `{token}`")))?;
    if n >= NUM_ARCH_REGS {
        return Err(SimError::parse(
            lineno,
            format!("register R{n} out of range (R0..R{})", NUM_ARCH_REGS - 1),
        ));
    }
    Ok(n)
}

/// Parses a `#<n>` literal token.
fn literal(token: &str, lineno: usize) -> Result<i32, SimError> {
    let digits = token
        .strip_prefix('#')
        .ok_or_else(|| SimError::parse(lineno, format!("expected literal, found `{token}`")))?;
    digits
        .parse()
        .map_err(|_| SimError::parse(lineno, format!("bad literal `{token}`")))
}
