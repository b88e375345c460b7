//! Random-program equivalence: for any terminating program, the committed
//! architectural state must match the in-order reference interpreter.

use proptest::prelude::*;

use oosim_core::Simulator;
use oosim_core::config::Config;
use oosim_core::isa::{Instruction, Opcode};

use crate::common::{reference_arf, step_checked};

/// Registers the generators write; R7 stays a stable memory base.
const WRITABLE_REGS: usize = 7;
/// Memory base held in R7 for generated loads and stores.
const MEM_BASE: i32 = 200;

fn arith_op() -> impl Strategy<Value = Opcode> {
    prop_oneof![
        Just(Opcode::Add),
        Just(Opcode::Sub),
        Just(Opcode::And),
        Just(Opcode::Or),
        Just(Opcode::Xor),
        Just(Opcode::Mul),
    ]
}

/// One random instruction from the terminating-by-construction subset:
/// arithmetic, loads/stores through the fixed base, and forward-only
/// conditional branches.
fn any_instr() -> impl Strategy<Value = Instruction> {
    prop_oneof![
        // MOVC rd, #imm
        (0..WRITABLE_REGS, -100i32..100).prop_map(|(rd, imm)| Instruction::movc(rd, imm)),
        // three-register arithmetic
        (arith_op(), 0..WRITABLE_REGS, 0..8usize, 0..8usize)
            .prop_map(|(op, rd, rs1, rs2)| Instruction::alu(op, rd, rs1, rs2)),
        // register-literal arithmetic
        (
            prop_oneof![Just(Opcode::Addl), Just(Opcode::Subl)],
            0..WRITABLE_REGS,
            0..8usize,
            -50i32..50
        )
            .prop_map(|(op, rd, rs1, imm)| Instruction::alu_lit(op, rd, rs1, imm)),
        // LOAD rd, R7, #off
        (0..WRITABLE_REGS, 0..50i32).prop_map(|(rd, off)| Instruction::load(rd, 7, off)),
        // STORE rs2, R7, #off
        (0..8usize, 0..50i32).prop_map(|(rs2, off)| Instruction::store(rs2, 7, off)),
        // forward conditional branches, displacement in whole instructions
        (
            prop_oneof![Just(Opcode::Bz), Just(Opcode::Bnz)],
            0..4i32
        )
            .prop_map(|(op, words)| Instruction::branch(op, 0, words * 4)),
    ]
}

/// A random program: base setup, a body, and enough trailing HALTs that
/// every forward branch lands on one.
fn program() -> impl Strategy<Value = Vec<Instruction>> {
    proptest::collection::vec(any_instr(), 1..40).prop_map(|body| {
        let mut code = vec![Instruction::movc(7, MEM_BASE)];
        code.extend(body);
        for _ in 0..4 {
            code.push(Instruction::halt());
        }
        code
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn engine_matches_reference_interpreter(code in program()) {
        let config = Config::default();
        let expected = reference_arf(&code, config.memory.size_words);

        let mut sim = Simulator::with_code(code, &config);
        let mut halted = false;
        for _ in 0..20_000u32 {
            if step_checked(&mut sim).expect("simulation error") {
                halted = true;
                break;
            }
        }
        prop_assert!(halted, "program did not reach HALT");
        prop_assert_eq!(sim.arch_regs(), expected);
    }
}
