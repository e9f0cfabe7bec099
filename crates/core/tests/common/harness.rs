//! Engine harness and history-scanning helpers.

use tomsim_core::common::Tag;
use tomsim_core::config::SimConfig;
use tomsim_core::core::Engine;
use tomsim_core::isa::Instruction;

/// Builds an engine, panicking on configuration errors. Installs a
/// test-writer tracing subscriber so `RUST_LOG` surfaces stage logs.
pub fn engine(config: SimConfig, program: Vec<Instruction>) -> Engine {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    Engine::new(config, program).unwrap()
}

/// Drives the engine to completion, panicking on simulator errors.
pub fn run(engine: &mut Engine) {
    engine.run_to_completion().unwrap();
}

/// Per-program-entry issue cycles at the end of the run.
pub fn issue_cycles(engine: &Engine) -> Vec<Option<u64>> {
    engine
        .history()
        .last()
        .map(|snap| snap.issue_cycles.clone())
        .unwrap_or_default()
}

/// The cycle in which `tag` won the bus, if it ever did.
pub fn broadcast_cycle(engine: &Engine, tag: Tag) -> Option<u64> {
    engine
        .history()
        .iter()
        .find_map(|snap| match snap.bus.current() {
            Some((t, _)) if t == tag => Some(snap.cycle),
            _ => None,
        })
}

/// Every bus broadcast in cycle order.
pub fn broadcasts(engine: &Engine) -> Vec<(u64, Tag, f64)> {
    engine
        .history()
        .iter()
        .filter_map(|snap| {
            snap.bus
                .current()
                .map(|(tag, value)| (snap.cycle, tag, value))
        })
        .collect()
}

/// The scheduled execution start of program entry `index`, read from
/// the first snapshot in which its slot carries a window.
pub fn exec_start_of(engine: &Engine, index: usize) -> Option<u64> {
    engine.history().iter().find_map(|snap| {
        snap.stations
            .iter()
            .chain(snap.buffers.iter())
            .flat_map(|pool| &pool.slots)
            .chain(std::iter::once(&snap.branch.slot))
            .find(|slot| slot.instr == Some(index) && slot.exec_start.is_some())
            .and_then(|slot| slot.exec_start)
    })
}
