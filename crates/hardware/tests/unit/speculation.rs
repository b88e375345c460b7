//! Speculation, squash, and recovery behavior.

use pretty_assertions::assert_eq;

use crate::common::{assemble, run_program, run_to_halt, MAX_CYCLES};

#[test]
fn jal_link_survives_its_own_squash() {
    // JAL always redirects, squashing its own shadow; the link register
    // write must survive the checkpoint restore.
    let regs = run_program(
        "MOVC,R1,#4016\n\
         JAL,R2,R1,#0\n\
         MOVC,R3,#99\n\
         MOVC,R3,#98\n\
         MOVC,R4,#1\n\
         HALT",
    );
    assert_eq!(regs[2], 4008, "link must hold the fall-through address");
    assert_eq!(regs[3], 0);
    assert_eq!(regs[4], 1);
}

#[test]
fn jal_return_path() {
    // Call over two instructions and return through the link register.
    let regs = run_program(
        "MOVC,R1,#4020\n\
         JAL,R2,R1,#0\n\
         MOVC,R3,#1\n\
         HALT\n\
         NOP\n\
         MOVC,R4,#2\n\
         JUMP,R2,#0\n\
         HALT",
    );
    assert_eq!(regs[2], 4008);
    assert_eq!(regs[3], 1);
    assert_eq!(regs[4], 2);
}

#[test]
fn squash_kills_multiply_in_flight() {
    // The branch waits on the multiplier's flag, which gives the
    // speculative multiply behind it time to occupy the unit; the squash
    // must idle it before it completes.
    let regs = run_program(
        "MOVC,R1,#2\n\
         MOVC,R2,#0\n\
         MUL,R3,R1,R2\n\
         BZ,R1,#8\n\
         MUL,R4,R1,R1\n\
         MOVC,R5,#9\n\
         MOVC,R6,#6\n\
         HALT",
    );
    assert_eq!(regs[3], 0);
    assert_eq!(regs[4], 0, "speculative multiply must not commit");
    assert_eq!(regs[5], 0, "speculative move must not commit");
    assert_eq!(regs[6], 6);
}

#[test]
fn squashed_memory_ops_drain_from_the_queues() {
    // A speculative store and load sit in the LSQ when the branch
    // resolves; both must drain as bubbles and leave memory untouched.
    let mut sim = assemble(
        "MOVC,R1,#2\n\
         MOVC,R2,#0\n\
         MOVC,R6,#100\n\
         MUL,R3,R1,R2\n\
         BZ,R9,#12\n\
         STORE,R1,R6,#0\n\
         LOAD,R4,R6,#0\n\
         MOVC,R7,#1\n\
         MOVC,R5,#5\n\
         HALT",
    );
    let _ = run_to_halt(&mut sim, MAX_CYCLES);
    let regs = sim.arch_regs();
    assert_eq!(regs[5], 5);
    assert_eq!(regs[4], 0, "speculative load must not commit");
    assert_eq!(regs[7], 0, "speculative move must not commit");
    assert_eq!(sim.cpu.memory[100], 0, "speculative store must not land");
    assert!(sim.pipeline.lsq.is_empty(), "squashed entries must drain");
}

#[test]
fn not_taken_branch_frees_its_shadow() {
    // Flag is clear, so BZ falls through; everything in its shadow
    // commits normally and the control-flow ID is reusable afterwards.
    let regs = run_program(
        "MOVC,R1,#5\n\
         BZ,R1,#8\n\
         MOVC,R2,#7\n\
         MOVC,R3,#8\n\
         MOVC,R4,#9\n\
         HALT",
    );
    assert_eq!(regs[2], 7);
    assert_eq!(regs[3], 8);
    assert_eq!(regs[4], 9);
}

#[test]
fn many_branches_recycle_control_flow_ids() {
    // More branches than control-flow IDs; resolution must recycle them.
    let mut src = String::from("MOVC,R1,#5\n");
    for _ in 0..20 {
        src.push_str("BZ,R1,#4\nADDL,R2,R2,#1\n");
    }
    src.push_str("HALT");
    let regs = run_program(&src);
    assert_eq!(regs[2], 20, "every fall-through increment must commit");
}

#[test]
fn nested_speculation_outer_taken() {
    // The outer branch waits on a chain of multiplies, long enough for an
    // inner branch to dispatch in its shadow; when the outer branch
    // resolves taken it must kill the whole suffix, the live inner branch
    // included.
    let regs = run_program(
        "MOVC,R1,#1\n\
         MOVC,R2,#0\n\
         MUL,R3,R2,R2\n\
         MUL,R8,R3,R3\n\
         BZ,R9,#16\n\
         MOVC,R4,#1\n\
         BNZ,R4,#0\n\
         MOVC,R5,#2\n\
         MOVC,R6,#3\n\
         MOVC,R7,#7\n\
         HALT",
    );
    assert_eq!(regs[7], 7);
    assert_eq!(regs[4], 0);
    assert_eq!(regs[5], 0);
    assert_eq!(regs[6], 0);
}

#[test]
fn back_to_back_taken_branches() {
    let regs = run_program(
        "MOVC,R1,#0\n\
         BZ,R1,#4\n\
         MOVC,R2,#99\n\
         BZ,R1,#4\n\
         MOVC,R3,#99\n\
         MOVC,R4,#4\n\
         HALT",
    );
    assert_eq!(regs[2], 0);
    assert_eq!(regs[3], 0);
    assert_eq!(regs[4], 4);
}
