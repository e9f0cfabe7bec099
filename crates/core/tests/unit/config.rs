//! # Configuration Tests
//!
//! Tests for defaults, latency resolution, JSON deserialization, and
//! validation of the simulation configuration.

use rstest::rstest;
use tomsim_core::Engine;
use tomsim_core::common::SimError;
use tomsim_core::config::{MemoryConfig, MemoryInit, PoolConfig, SimConfig};
use tomsim_core::isa::Opcode;

#[test]
fn test_default_pools() {
    let config = SimConfig::default();
    assert_eq!(config.stations.len(), 5);
    assert_eq!(config.buffers.len(), 2);
    assert_eq!(
        config.stations[0],
        PoolConfig {
            capacity: 3,
            op: Opcode::AddD
        }
    );
    assert_eq!(
        config.buffers[0],
        PoolConfig {
            capacity: 2,
            op: Opcode::LoadD
        }
    );
    assert_eq!(config.registers, 32);
    assert_eq!(config.max_cycles, 10_000);
    assert!(config.validate().is_ok());
}

#[test]
fn test_default_memory_geometry() {
    let memory = MemoryConfig::default();
    assert_eq!(memory.cache_size, 1024);
    assert_eq!(memory.block_size, 64);
    assert_eq!(memory.hit_latency, 1);
    assert_eq!(memory.miss_penalty, 10);
    assert_eq!(memory.memory_size, 256);
}

#[test]
fn test_latency_catalog_defaults() {
    let config = SimConfig::default();
    assert_eq!(config.latency(Opcode::Daddi), 1);
    assert_eq!(config.latency(Opcode::AddD), 2);
    assert_eq!(config.latency(Opcode::LoadD), 2);
    assert_eq!(config.latency(Opcode::MulD), 10);
    assert_eq!(config.latency(Opcode::DivD), 40);
    assert_eq!(config.latency(Opcode::Beq), 1);
}

#[test]
fn test_latency_override_leaves_other_entries() {
    let mut config = SimConfig::default();
    let _ = config.latencies.insert(Opcode::MulD, 4);
    assert_eq!(config.latency(Opcode::MulD), 4);
    assert_eq!(config.latency(Opcode::DivD), 40);
}

#[test]
fn test_deserialize_scenario_config() {
    let json = r#"{
        "stations": [
            { "capacity": 2, "op": "ADD_D" },
            { "capacity": 1, "op": "MUL_D" }
        ],
        "buffers": [{ "capacity": 2, "op": "L_D" }],
        "memory": { "cache_size": 128, "block_size": 16 },
        "latencies": { "MUL_D": 6 },
        "initial_memory": [{ "address": 3, "value": 2.5 }]
    }"#;
    let config: SimConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.stations[1].op, Opcode::MulD);
    assert_eq!(config.memory.cache_size, 128);
    // Omitted memory fields fall back to their defaults.
    assert_eq!(config.memory.miss_penalty, 10);
    assert_eq!(config.latency(Opcode::MulD), 6);
    assert_eq!(config.latency(Opcode::AddD), 2);
    assert_eq!(config.registers, 32);
    assert_eq!(
        config.initial_memory,
        vec![MemoryInit {
            address: 3,
            value: 2.5
        }]
    );
    assert!(config.validate().is_ok());
}

#[rstest]
#[case::zero_registers(|c: &mut SimConfig| c.registers = 0)]
#[case::zero_block_size(|c: &mut SimConfig| c.memory.block_size = 0)]
#[case::block_exceeds_cache(|c: &mut SimConfig| {
    c.memory.block_size = 64;
    c.memory.cache_size = 32;
})]
#[case::empty_backing_store(|c: &mut SimConfig| c.memory.memory_size = 0)]
#[case::zero_cycle_guard(|c: &mut SimConfig| c.max_cycles = 0)]
#[case::zero_latency(|c: &mut SimConfig| {
    let _ = c.latencies.insert(Opcode::AddD, 0);
})]
#[case::memory_op_in_station(|c: &mut SimConfig| c.stations.push(PoolConfig {
    capacity: 1,
    op: Opcode::LoadD,
}))]
#[case::arith_op_in_buffer(|c: &mut SimConfig| c.buffers.push(PoolConfig {
    capacity: 1,
    op: Opcode::AddD,
}))]
#[case::zero_capacity_pool(|c: &mut SimConfig| c.stations[0].capacity = 0)]
#[case::seed_outside_backing_store(|c: &mut SimConfig| c.initial_memory.push(MemoryInit {
    address: 256,
    value: 1.0,
}))]
fn test_validate_rejects(#[case] corrupt: fn(&mut SimConfig)) {
    let mut config = SimConfig::default();
    corrupt(&mut config);
    assert!(matches!(config.validate(), Err(SimError::Config(_))));
}

#[test]
fn test_zero_latency_never_reaches_execution() {
    // A zero-length window would close before the execute stage runs
    // and the bus would carry a default value instead of the result, so
    // construction refuses the configuration outright.
    let mut config = SimConfig::default();
    let _ = config.latencies.insert(Opcode::AddD, 0);
    let program = vec![tomsim_core::isa::Instruction::new(
        Opcode::AddD,
        Some(tomsim_core::isa::Dest::Reg("F2".into())),
        tomsim_core::isa::Source::Reg("F0".into()),
        Some(tomsim_core::isa::Source::Reg("F4".into())),
    )];
    assert!(matches!(
        Engine::new(config, program),
        Err(SimError::Config(_))
    ));
}
