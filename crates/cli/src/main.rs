//! Tomasulo scheduling simulator CLI.
//!
//! This binary provides a single entry point for driving the simulator. It performs:
//! 1. **Run:** Execute a JSON scenario (configuration + program) to completion and
//!    report per-instruction timing and final register state.
//! 2. **Snapshot:** Run a scenario and dump the recorded state of one cycle as JSON
//!    for external rendering.

use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::{fs, process};
use tracing_subscriber::EnvFilter;

use tomsim_core::core::regfile::RegisterFile;
use tomsim_core::isa::Instruction;
use tomsim_core::{Engine, SimConfig};

/// A scenario file: configuration plus the program to run.
#[derive(Debug, Deserialize)]
struct Scenario {
    /// Simulator configuration; omitted fields use defaults.
    #[serde(default)]
    config: SimConfig,
    /// The program, in issue order.
    program: Vec<Instruction>,
}

#[derive(Parser, Debug)]
#[command(
    name = "tomsim",
    author,
    version,
    about = "Cycle-accurate Tomasulo scheduling simulator",
    long_about = "Run a JSON scenario (configuration + program) through the Tomasulo engine.\n\nExamples:\n  tomsim run scenario.json\n  tomsim run scenario.json --until 12\n  tomsim snapshot scenario.json --cycle 5"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a scenario to completion (or up to a cycle bound) and report results.
    Run {
        /// Scenario file (JSON: config + program).
        file: String,

        /// Stop after this many cycles instead of running to completion.
        #[arg(long)]
        until: Option<u64>,
    },

    /// Run a scenario and print one recorded cycle snapshot as JSON.
    Snapshot {
        /// Scenario file (JSON: config + program).
        file: String,

        /// Cycle to dump (1-based).
        #[arg(long)]
        cycle: u64,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { file, until } => cmd_run(&file, until),
        Commands::Snapshot { file, cycle } => cmd_snapshot(&file, cycle),
    }
}

/// Loads a scenario file and constructs the engine, exiting on any error.
fn load_engine(file: &str) -> Engine {
    let text = fs::read_to_string(file).unwrap_or_else(|e| {
        eprintln!("Error reading scenario {file}: {e}");
        process::exit(1);
    });
    let scenario: Scenario = serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("Error parsing scenario {file}: {e}");
        process::exit(1);
    });
    Engine::new(scenario.config, scenario.program).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    })
}

/// Runs the scenario and prints a timing and register report.
fn cmd_run(file: &str, until: Option<u64>) {
    let mut engine = load_engine(file);

    let outcome = match until {
        Some(bound) => {
            let mut result = Ok(());
            while !engine.is_complete() && engine.cycle() < bound {
                result = engine.step();
                if result.is_err() {
                    break;
                }
            }
            result
        }
        None => engine.run_to_completion(),
    };
    if let Err(e) = outcome {
        eprintln!("\n[!] Simulation aborted: {e}");
        process::exit(1);
    }

    println!(
        "Completed: {} after {} cycle(s)",
        engine.is_complete(),
        engine.cycle()
    );
    println!();

    println!("Program:");
    let issue_cycles = engine
        .history()
        .last()
        .map(|snapshot| snapshot.issue_cycles.clone())
        .unwrap_or_default();
    for (index, instruction) in engine.program().iter().enumerate() {
        let rendered = instruction.to_string();
        let issued = issue_cycles
            .get(index)
            .copied()
            .flatten()
            .map_or_else(|| "-".to_string(), |cycle| cycle.to_string());
        println!("  [{index:>2}] {rendered:<24} issue: {issued}");
    }
    println!();

    println!("Registers (non-zero):");
    for (index, reg) in engine.registers().iter().enumerate() {
        if reg.value != 0.0 {
            println!("  {:<4} = {}", RegisterFile::name(index), reg.value);
        }
    }
}

/// Runs the scenario and dumps the requested cycle snapshot as JSON.
fn cmd_snapshot(file: &str, cycle: u64) {
    let mut engine = load_engine(file);
    while !engine.is_complete() && engine.cycle() < cycle {
        if let Err(e) = engine.step() {
            eprintln!("\n[!] Simulation aborted: {e}");
            process::exit(1);
        }
    }
    match engine.snapshot(cycle) {
        Ok(snapshot) => match serde_json::to_string_pretty(snapshot) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing snapshot: {e}");
                process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
