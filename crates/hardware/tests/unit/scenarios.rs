//! Concrete end-to-end scenarios: post-commit architectural state for
//! small hand-written programs.

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::{assemble, run_program, run_to_halt, MAX_CYCLES};

#[test]
fn constant_move() {
    let regs = run_program("MOVC,R1,#7\nHALT");
    assert_eq!(regs[1], 7);
}

#[test]
fn data_dependency_through_rename() {
    let regs = run_program(
        "MOVC,R1,#3\n\
         MOVC,R2,#4\n\
         ADD,R3,R1,R2\n\
         HALT",
    );
    assert_eq!(regs[1], 3);
    assert_eq!(regs[2], 4);
    assert_eq!(regs[3], 7);
}

#[test]
fn multiplier_latency_respects_dependencies() {
    let regs = run_program(
        "MOVC,R1,#5\n\
         MOVC,R2,#6\n\
         MUL,R3,R1,R2\n\
         ADD,R4,R3,R1\n\
         HALT",
    );
    assert_eq!(regs[3], 30);
    assert_eq!(regs[4], 35);
}

#[test]
fn taken_branch_squashes_shadow() {
    // MOVC R1,#0 sets the zero flag; BZ skips the two speculative writes
    // to R2 (displacement counts from the fall-through address).
    let regs = run_program(
        "MOVC,R1,#0\n\
         BZ,R1,#8\n\
         MOVC,R2,#99\n\
         MOVC,R2,#100\n\
         MOVC,R3,#1\n\
         HALT",
    );
    assert_eq!(regs[2], 0, "speculative writes must not commit");
    assert_eq!(regs[3], 1);
    assert_eq!(regs[1], 0);
}

#[test]
fn store_then_load_in_order() {
    let regs = run_program(
        "MOVC,R1,#12\n\
         MOVC,R2,#100\n\
         STORE,R1,R2,#0\n\
         LOAD,R3,R2,#0\n\
         HALT",
    );
    assert_eq!(regs[3], 12);
}

#[test]
fn arithmetic_commits_in_program_order() {
    let regs = run_program(
        "MOVC,R1,#10\n\
         MOVC,R2,#3\n\
         SUB,R3,R1,R2\n\
         AND,R4,R1,R2\n\
         OR,R5,R1,R2\n\
         XOR,R6,R1,R2\n\
         ADDL,R7,R1,#5\n\
         SUBL,R8,R1,#5\n\
         HALT",
    );
    assert_eq!(regs[3], 7);
    assert_eq!(regs[4], 10 & 3);
    assert_eq!(regs[5], 10 | 3);
    assert_eq!(regs[6], 10 ^ 3);
    assert_eq!(regs[7], 15);
    assert_eq!(regs[8], 5);
}

#[rstest]
// Flag clear: BZ falls through, BNZ jumps.
#[case("MOVC,R1,#5", 7, 0)]
// Flag set: BZ jumps, BNZ falls through.
#[case("MOVC,R1,#0", 0, 7)]
fn conditional_branch_polarity(
    #[case] producer: &str,
    #[case] expected_bz: i32,
    #[case] expected_bnz: i32,
) {
    let bz = run_program(&format!(
        "{producer}\n\
         BZ,R1,#4\n\
         MOVC,R2,#7\n\
         MOVC,R3,#1\n\
         HALT"
    ));
    assert_eq!(bz[2], expected_bz);
    assert_eq!(bz[3], 1);

    let bnz = run_program(&format!(
        "{producer}\n\
         BNZ,R1,#4\n\
         MOVC,R2,#7\n\
         MOVC,R3,#1\n\
         HALT"
    ));
    assert_eq!(bnz[2], expected_bnz);
    assert_eq!(bnz[3], 1);
}

#[test]
fn jump_is_register_indirect() {
    // R1 holds the code base; jump lands past the poisoned write.
    let regs = run_program(
        "MOVC,R1,#4000\n\
         JUMP,R1,#16\n\
         MOVC,R2,#99\n\
         MOVC,R2,#98\n\
         MOVC,R3,#5\n\
         HALT",
    );
    assert_eq!(regs[2], 0);
    assert_eq!(regs[3], 5);
}

#[test]
fn branch_on_flag_from_multiplier() {
    // The branch has to wait for the multiplier to deliver the flag.
    let regs = run_program(
        "MOVC,R1,#3\n\
         MOVC,R2,#0\n\
         MUL,R3,R1,R2\n\
         BZ,R1,#4\n\
         MOVC,R4,#99\n\
         MOVC,R5,#1\n\
         HALT",
    );
    assert_eq!(regs[3], 0);
    assert_eq!(regs[4], 0, "branch on the multiplier's flag must be taken");
    assert_eq!(regs[5], 1);
}

#[test]
fn halt_waits_for_store_drain() {
    // The store is still in the memory unit when HALT reaches the ROB
    // head; retirement must wait, and the store must land.
    let mut sim = assemble(
        "MOVC,R1,#42\n\
         MOVC,R2,#50\n\
         STORE,R1,R2,#0\n\
         HALT",
    );
    let _ = run_to_halt(&mut sim, MAX_CYCLES);
    assert_eq!(sim.cpu.memory[50], 42);
}
