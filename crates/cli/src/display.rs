//! Per-cycle machine state rendering for the console driver.

use oosim_core::Simulator;
use oosim_core::common::constants::{CODE_START_ADDR, INSTRUCTION_SIZE, NUM_ARCH_REGS};
use oosim_core::core::pipeline::fu::FunctionalUnit;

/// Prints the program listing shown at load time.
pub fn print_listing(sim: &Simulator) {
    println!("{:<9} instruction", "pc");
    for (i, instr) in sim.cpu.code.iter().enumerate() {
        let pc = CODE_START_ADDR + INSTRUCTION_SIZE * i as u32;
        println!("{pc:<9} {instr}");
    }
}

/// Prints one cycle's machine state: functional units, reorder buffer,
/// instruction queue, load-store queue, and committed register values.
pub fn print_cycle(sim: &Simulator) {
    println!("--------------------------------");
    println!("Clock Cycle #{}", sim.cycle());
    println!("--------------------------------");

    print_fu("intFU", &sim.pipeline.int_fu);
    print_fu("mulFU", &sim.pipeline.mul_fu);
    print_fu("memFU", &sim.pipeline.mem_fu);

    println!(
        "ROB [{}/{}]:",
        sim.pipeline.rob.len(),
        sim.pipeline.rob.capacity()
    );
    for (idx, e) in sim.pipeline.rob.iter_in_order() {
        println!(
            "  [{idx:>2}] pc={:<6} {:<6} {} rd={} cfid={}",
            e.pc,
            e.opcode.to_string(),
            if e.completed { "done   " } else { "pending" },
            fmt_opt(e.phys_rd, "P"),
            fmt_opt(e.cfid, ""),
        );
    }

    println!("IQ [{}]:", sim.pipeline.iq.len());
    for (idx, e) in sim.pipeline.iq.entries().iter().enumerate() {
        if !e.allocated {
            continue;
        }
        println!(
            "  [{idx:>2}] pc={:<6} {:<6} rs1={} rs2={} age={}",
            e.pc,
            e.opcode.to_string(),
            fmt_operand(e.rs1.tag, e.rs1.ready, e.rs1.value),
            fmt_operand(e.rs2.tag, e.rs2.ready, e.rs2.value),
            e.dispatch_cycle,
        );
    }

    println!("LSQ [{}]:", sim.pipeline.lsq.len());
    for (idx, e) in sim.pipeline.lsq.iter_in_order() {
        let addr = if e.addr_valid {
            e.addr.to_string()
        } else {
            "?".to_string()
        };
        println!(
            "  [{idx:>2}] pc={:<6} {:<6} addr={addr:<6} {}",
            e.pc,
            e.opcode.to_string(),
            if e.done { "done" } else { "pending" },
        );
    }

    println!("ARF:");
    let values = sim.arch_regs();
    for (r, v) in values.iter().enumerate().take(NUM_ARCH_REGS) {
        print!("  R{r:<2}={v:<8}");
        if r % 4 == 3 {
            println!();
        }
    }
    println!(
        "free physical registers: {}",
        sim.cpu.prf.free_count()
    );
}

fn print_fu(name: &str, fu: &FunctionalUnit) {
    if fu.is_idle() {
        println!("{name}: idle");
    } else {
        println!(
            "{name}: pc={} {} ({} cycle(s) left)",
            fu.op.pc, fu.op.opcode, fu.countdown
        );
    }
}

fn fmt_opt(v: Option<usize>, prefix: &str) -> String {
    v.map_or_else(|| "-".to_string(), |x| format!("{prefix}{x}"))
}

fn fmt_operand(tag: Option<usize>, ready: bool, value: i32) -> String {
    if ready {
        format!("{value}")
    } else {
        format!("(P{})", tag.unwrap_or(0))
    }
}
