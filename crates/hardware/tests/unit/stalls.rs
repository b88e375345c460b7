//! Behavior under resource-exhaustion stalls: every structure-full case
//! is a one-cycle upstream stall and retry, never a wrong answer.

use pretty_assertions::assert_eq;

use oosim_core::config::Config;

use crate::common::{assemble_with, run_to_halt, MAX_CYCLES};

/// A long chain of writers to one register, checked against the last
/// value. With enough writers in flight this exhausts whichever structure
/// the config squeezes.
fn writer_chain(n: i32) -> String {
    let mut src = String::new();
    for i in 0..n {
        src.push_str(&format!("MOVC,R1,#{i}\n"));
    }
    src.push_str("HALT");
    src
}

#[test]
fn register_file_exhaustion_stalls_and_recovers() {
    // A dependent multiply chain keeps the ROB head uncommitted while the
    // writers behind it claim every physical register; decode must stall
    // until retirement frees predecessors, and the final state must still
    // be exact.
    let mut config = Config::default();
    config.core.num_phys_regs = 8;
    let mut src = String::from(
        "MOVC,R1,#2\n\
         MUL,R2,R1,R1\n\
         MUL,R3,R2,R2\n",
    );
    src.push_str(&writer_chain(10));
    let mut sim = assemble_with(&src, &config);
    let _ = run_to_halt(&mut sim, MAX_CYCLES);
    let regs = sim.arch_regs();
    assert_eq!(regs[2], 4);
    assert_eq!(regs[3], 16);
    assert_eq!(regs[1], 9);
    assert!(
        sim.cpu.stats.stalls_rename > 0,
        "the register file must have run dry at least once"
    );
}

#[test]
fn tiny_rob_still_computes_correctly() {
    let mut config = Config::default();
    config.core.rob_size = 2;
    let mut sim = assemble_with(&writer_chain(12), &config);
    let _ = run_to_halt(&mut sim, MAX_CYCLES);
    assert_eq!(sim.arch_regs()[1], 11);
    assert!(sim.cpu.stats.stalls_structural > 0);
}

#[test]
fn tiny_iq_still_computes_correctly() {
    let mut config = Config::default();
    config.core.iq_size = 1;
    let mut sim = assemble_with(
        "MOVC,R1,#3\n\
         MOVC,R2,#4\n\
         MUL,R3,R1,R2\n\
         ADD,R4,R3,R2\n\
         SUB,R5,R4,R1\n\
         HALT",
        &config,
    );
    let _ = run_to_halt(&mut sim, MAX_CYCLES);
    let regs = sim.arch_regs();
    assert_eq!(regs[3], 12);
    assert_eq!(regs[4], 16);
    assert_eq!(regs[5], 13);
}

#[test]
fn tiny_lsq_still_orders_memory() {
    let mut config = Config::default();
    config.core.lsq_size = 1;
    let mut sim = assemble_with(
        "MOVC,R1,#9\n\
         MOVC,R2,#40\n\
         STORE,R1,R2,#0\n\
         LOAD,R3,R2,#0\n\
         STORE,R3,R2,#4\n\
         LOAD,R4,R2,#4\n\
         HALT",
        &config,
    );
    let _ = run_to_halt(&mut sim, MAX_CYCLES);
    let regs = sim.arch_regs();
    assert_eq!(regs[3], 9);
    assert_eq!(regs[4], 9);
}

#[test]
fn single_control_flow_id_still_speculates() {
    let mut config = Config::default();
    config.core.cfq_size = 1;
    let mut sim = assemble_with(
        "MOVC,R1,#0\n\
         BZ,R1,#4\n\
         MOVC,R2,#99\n\
         BZ,R1,#4\n\
         MOVC,R3,#99\n\
         MOVC,R4,#4\n\
         HALT",
        &config,
    );
    let _ = run_to_halt(&mut sim, MAX_CYCLES);
    let regs = sim.arch_regs();
    assert_eq!(regs[2], 0);
    assert_eq!(regs[3], 0);
    assert_eq!(regs[4], 4);
}
