//! Shared test infrastructure: harness helpers and the in-order reference
//! interpreter.

use oosim_core::common::constants::{
    CODE_START_ADDR, INSTRUCTION_SIZE, NUM_ARCH_REGS,
};
use oosim_core::config::Config;
use oosim_core::isa::{Instruction, Opcode};
use oosim_core::{SimError, Simulator};

/// Default cycle limit for programs in this suite.
pub const MAX_CYCLES: u64 = 10_000;

/// Assembles a program with the default machine configuration.
pub fn assemble(src: &str) -> Simulator {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    Simulator::from_source(src, &Config::default()).expect("program must assemble")
}

/// Assembles a program with a custom configuration.
pub fn assemble_with(src: &str, config: &Config) -> Simulator {
    Simulator::from_source(src, config).expect("program must assemble")
}

/// Runs until HALT retires, validating the microarchitectural invariants
/// after every cycle. Returns the cycle count at completion.
pub fn run_to_halt(sim: &mut Simulator, max_cycles: u64) -> u64 {
    for _ in 0..max_cycles {
        let done = step_checked(sim).expect("simulation error");
        if done {
            return sim.cycle();
        }
    }
    panic!("did not halt within {max_cycles} cycles");
}

/// Single validated step.
pub fn step_checked(sim: &mut Simulator) -> Result<bool, SimError> {
    let done = sim.step()?;
    if let Err(v) = sim.validate() {
        panic!("invariant violated at cycle {}: {v}", sim.cycle());
    }
    Ok(done)
}

/// Assembles, runs to HALT, and returns the committed register state.
pub fn run_program(src: &str) -> [i32; NUM_ARCH_REGS] {
    let mut sim = assemble(src);
    let _ = run_to_halt(&mut sim, MAX_CYCLES);
    sim.arch_regs()
}

/// In-order reference interpreter: executes the program sequentially and
/// returns the final architectural register state. The out-of-order engine
/// must commit exactly this state for any terminating program.
pub fn reference_arf(code: &[Instruction], mem_words: usize) -> [i32; NUM_ARCH_REGS] {
    let mut regs = [0i32; NUM_ARCH_REGS];
    let mut memory = vec![0i32; mem_words];
    let mut zero_flag = false;
    let mut pc = CODE_START_ADDR;

    for _ in 0..1_000_000u32 {
        let off = pc.checked_sub(CODE_START_ADDR).expect("pc below code base");
        assert_eq!(off % INSTRUCTION_SIZE, 0, "misaligned reference pc");
        let idx = (off / INSTRUCTION_SIZE) as usize;
        assert!(idx < code.len(), "reference ran past the end of code");
        let i = code[idx];

        let rs1 = i.rs1.map_or(0, |r| regs[r]);
        let rs2 = i.rs2.map_or(0, |r| regs[r]);
        let mut next_pc = pc + INSTRUCTION_SIZE;
        let mut result: Option<i32> = None;

        match i.opcode {
            Opcode::Movc => result = Some(i.imm),
            Opcode::Add => result = Some(rs1.wrapping_add(rs2)),
            Opcode::Sub => result = Some(rs1.wrapping_sub(rs2)),
            Opcode::And => result = Some(rs1 & rs2),
            Opcode::Or => result = Some(rs1 | rs2),
            Opcode::Xor => result = Some(rs1 ^ rs2),
            Opcode::Mul => result = Some(rs1.wrapping_mul(rs2)),
            Opcode::Addl => result = Some(rs1.wrapping_add(i.imm)),
            Opcode::Subl => result = Some(rs1.wrapping_sub(i.imm)),
            Opcode::Load => {
                let addr = rs1.wrapping_add(i.imm);
                regs[i.rd.expect("load has rd")] = memory[addr as usize];
            }
            Opcode::Store => {
                let addr = rs1.wrapping_add(i.imm);
                memory[addr as usize] = rs2;
            }
            Opcode::Bz => {
                if zero_flag {
                    next_pc = (next_pc as i32).wrapping_add(i.imm) as u32;
                }
            }
            Opcode::Bnz => {
                if !zero_flag {
                    next_pc = (next_pc as i32).wrapping_add(i.imm) as u32;
                }
            }
            Opcode::Jump => next_pc = rs1.wrapping_add(i.imm) as u32,
            Opcode::Jal => {
                regs[i.rd.expect("jal has rd")] = next_pc as i32;
                next_pc = rs1.wrapping_add(i.imm) as u32;
            }
            Opcode::Nop => {}
            Opcode::Halt => return regs,
        }

        if let Some(v) = result {
            regs[i.rd.expect("writer has rd")] = v;
            zero_flag = v == 0;
        }
        pc = next_pc;
    }
    panic!("reference interpreter did not reach HALT");
}
