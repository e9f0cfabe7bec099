//! # Snapshot History Tests
//!
//! The recorded history is append-only and value-cloned: one snapshot
//! per cycle, immutable under later mutation, and serializable for an
//! external presentation layer.

use crate::common::builders::{arith, single_slot_config, with_latency};
use crate::common::harness::{engine, run};
use pretty_assertions::assert_eq;
use tomsim_core::SimConfig;
use tomsim_core::common::SimError;
use tomsim_core::core::Engine;
use tomsim_core::isa::Opcode;

fn sample_engine() -> Engine {
    engine(
        SimConfig::default(),
        vec![
            arith(Opcode::AddD, "F1", "F0", "F0"),
            arith(Opcode::SubD, "F2", "F1", "F0"),
            arith(Opcode::MulD, "F3", "F2", "F0"),
        ],
    )
}

#[test]
fn test_history_grows_one_per_cycle() {
    let mut eng = sample_engine();
    run(&mut eng);
    assert_eq!(eng.history().len() as u64, eng.cycle());
    for (i, snap) in eng.history().iter().enumerate() {
        assert_eq!(snap.cycle, i as u64 + 1);
    }
}

#[test]
fn test_snapshot_is_immutable_under_later_cycles() {
    let mut eng = sample_engine();
    eng.step().unwrap();
    eng.step().unwrap();
    let frozen = eng.snapshot(2).unwrap().clone();
    run(&mut eng);
    assert_eq!(&frozen, eng.snapshot(2).unwrap());
}

#[test]
fn test_out_of_range_snapshots_are_errors() {
    let mut eng = sample_engine();
    eng.step().unwrap();
    assert!(matches!(
        eng.snapshot(0),
        Err(SimError::Snapshot {
            cycle: 0,
            recorded: 1
        })
    ));
    assert!(matches!(
        eng.snapshot(2),
        Err(SimError::Snapshot {
            cycle: 2,
            recorded: 1
        })
    ));
}

#[test]
fn test_bus_is_visible_for_exactly_one_cycle() {
    let config = with_latency(
        single_slot_config(&[Opcode::AddD, Opcode::MulD], &[]),
        Opcode::MulD,
        10,
    );
    let mut eng = engine(
        config,
        vec![
            arith(Opcode::AddD, "F1", "F0", "F0"),
            arith(Opcode::MulD, "F2", "F0", "F0"),
        ],
    );
    run(&mut eng);
    // Add: window 2..=3, broadcast 4. Multiply: window 3..=12,
    // broadcast 13. Every cycle in between shows an empty bus.
    assert!(eng.snapshot(4).unwrap().bus.current().is_some());
    for cycle in 5..=12 {
        assert!(eng.snapshot(cycle).unwrap().bus.is_empty());
    }
    assert!(eng.snapshot(13).unwrap().bus.current().is_some());
}

#[test]
fn test_complete_flag_only_on_final_cycle() {
    let mut eng = sample_engine();
    run(&mut eng);
    let history = eng.history();
    for snap in &history[..history.len() - 1] {
        assert!(!snap.complete);
    }
    assert!(history[history.len() - 1].complete);
}

#[test]
fn test_step_after_completion_is_a_no_op() {
    let mut eng = sample_engine();
    run(&mut eng);
    let cycle = eng.cycle();
    eng.step().unwrap();
    assert_eq!(eng.cycle(), cycle);
    assert_eq!(eng.history().len() as u64, cycle);
}

#[test]
fn test_reset_replays_identically() {
    let mut eng = sample_engine();
    run(&mut eng);
    let first = eng.history().to_vec();

    eng.reset();
    assert_eq!(eng.cycle(), 0);
    assert!(eng.history().is_empty());
    assert!(matches!(eng.snapshot(1), Err(SimError::Snapshot { .. })));
    assert_eq!(eng.register_value("F1"), Some(0.0));
    assert!(!eng.is_complete());

    run(&mut eng);
    assert_eq!(first, eng.history().to_vec());
}

#[test]
fn test_snapshots_serialize_to_json() {
    let mut eng = sample_engine();
    run(&mut eng);
    let value = serde_json::to_value(eng.snapshot(1).unwrap()).unwrap();
    assert_eq!(value["cycle"], 1);
    assert!(value["stations"].is_array());
    assert_eq!(value["registers"].as_array().unwrap().len(), 32);
    assert_eq!(value["issue_cycles"][0], 1);
}
