//! Cycle-accurate out-of-order simulator CLI.
//!
//! Loads an assembly program, prints its listing, then drives the engine
//! from a small console loop:
//! 1. **`simulate N`** — advance N cycles silently.
//! 2. **`display N`** — advance N cycles, printing machine state per cycle.
//! 3. **`step`** (or a bare return) — advance one cycle with state.
//! 4. **`quit`** — print statistics and exit.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::{fs, process};

use clap::Parser;

use oosim_core::{Config, Simulator};

mod display;

#[derive(Parser, Debug)]
#[command(
    name = "sim",
    author,
    version,
    about = "Cycle-accurate out-of-order superscalar simulator",
    long_about = "Simulate an assembly program on an out-of-order superscalar core.\n\nThe program is one instruction per line, comma-separated, with R-prefixed\nregisters and #-prefixed literals:\n  MOVC,R1,#7\n  ADD,R3,R1,R2\n  HALT\n\nMachine sizing (structure capacities, latencies) can be overridden with a\nJSON config file via --config."
)]
struct Cli {
    /// Assembly program to simulate.
    program: PathBuf,

    /// JSON configuration file overriding the machine defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("sim> failed to read config {}: {e}", path.display());
                process::exit(1);
            });
            Config::from_json(&json).unwrap_or_else(|e| {
                eprintln!("sim> {e}");
                process::exit(1);
            })
        }
        None => Config::default(),
    };

    let sim = Simulator::new(&cli.program, &config).unwrap_or_else(|e| {
        eprintln!("sim> {e}");
        process::exit(1);
    });

    eprintln!(
        "sim> machine initialized ; {} instructions",
        sim.cpu.code.len()
    );
    display::print_listing(&sim);

    repl(sim);
}

fn print_usage() {
    println!("sim> commands: simulate <cycles> | display <cycles> | step | quit");
}

fn repl(mut sim: Simulator) {
    print_usage();
    let stdin = io::stdin();
    loop {
        print!("sim> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let mut words = line.split_whitespace();
        match words.next() {
            None | Some("step") => advance(&mut sim, 1, true),
            Some("simulate" | "sim") => match parse_cycles(words.next()) {
                Some(n) => {
                    println!("sim> simulating {n} cycles");
                    advance(&mut sim, n, false);
                }
                None => println!("sim> give a cycle count, e.g. `simulate 50`"),
            },
            Some("display") => match parse_cycles(words.next()) {
                Some(n) => advance(&mut sim, n, true),
                None => println!("sim> give a cycle count, e.g. `display 10`"),
            },
            Some("quit" | "q") => {
                sim.cpu.stats.print();
                println!("sim> bye");
                break;
            }
            Some(other) => {
                println!("sim> unknown command `{other}`");
                print_usage();
            }
        }
    }
}

fn parse_cycles(token: Option<&str>) -> Option<u64> {
    token.and_then(|t| t.parse().ok())
}

/// Advances the machine, optionally printing per-cycle state, stopping at
/// the cycle bound or on HALT.
fn advance(sim: &mut Simulator, cycles: u64, show: bool) {
    if sim.is_done() {
        println!(
            "sim> machine already halted at cycle {} ; nothing to simulate",
            sim.cycle()
        );
        return;
    }
    for _ in 0..cycles {
        match sim.step() {
            Ok(done) => {
                if show {
                    display::print_cycle(sim);
                }
                if done {
                    println!(
                        "sim> no more instructions ; completed at cycle {}",
                        sim.cycle()
                    );
                    return;
                }
            }
            Err(e) => {
                eprintln!("sim> fatal: {e}");
                process::exit(1);
            }
        }
    }
    println!("sim> reached cycle {}", sim.cycle());
}
