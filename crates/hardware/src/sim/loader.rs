//! Program file loading.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::common::error::SimError;
use crate::isa::{Instruction, asm};

/// Reads and parses an assembly program file.
pub fn load_program(path: &Path) -> Result<Vec<Instruction>, SimError> {
    let src = fs::read_to_string(path)?;
    let code = asm::parse_program(&src)?;
    info!(
        path = %path.display(),
        instructions = code.len(),
        "program loaded"
    );
    Ok(code)
}
