//! Builders for programs and configurations.
//!
//! Instructions are verbose to spell out inline; these helpers keep
//! test programs close to the assembly they model.

use tomsim_core::config::{MemoryInit, PoolConfig, SimConfig};
use tomsim_core::isa::{Dest, Instruction, Opcode, Source};

/// A register source operand.
pub fn reg(name: &str) -> Source {
    Source::Reg(name.to_owned())
}

/// An immediate source operand.
pub fn imm(value: i64) -> Source {
    Source::Imm(value)
}

/// A three-register arithmetic instruction.
pub fn arith(op: Opcode, dest: &str, src1: &str, src2: &str) -> Instruction {
    Instruction::new(
        op,
        Some(Dest::Reg(dest.to_owned())),
        reg(src1),
        Some(reg(src2)),
    )
}

/// An immediate arithmetic instruction (`DADDI` / `DSUBI`).
pub fn arith_imm(op: Opcode, dest: &str, src: &str, value: i64) -> Instruction {
    Instruction::new(
        op,
        Some(Dest::Reg(dest.to_owned())),
        reg(src),
        Some(imm(value)),
    )
}

/// A load from a literal address.
pub fn load(op: Opcode, dest: &str, address: i64) -> Instruction {
    Instruction::new(op, Some(Dest::Reg(dest.to_owned())), imm(address), None)
}

/// A store of a register's value to a literal address.
pub fn store(op: Opcode, data: &str, address: i64) -> Instruction {
    Instruction::new(op, Some(Dest::Reg(data.to_owned())), imm(address), None)
}

/// A conditional branch to a program index.
pub fn branch(op: Opcode, target: usize, src1: &str, src2: &str) -> Instruction {
    Instruction::new(op, Some(Dest::Target(target)), reg(src1), Some(reg(src2)))
}

/// The default configuration with every pool replaced by a single slot
/// of each given operation kind, in order.
pub fn single_slot_config(stations: &[Opcode], buffers: &[Opcode]) -> SimConfig {
    SimConfig {
        stations: stations
            .iter()
            .map(|&op| PoolConfig { capacity: 1, op })
            .collect(),
        buffers: buffers
            .iter()
            .map(|&op| PoolConfig { capacity: 1, op })
            .collect(),
        ..SimConfig::default()
    }
}

/// Overrides one operation's execute latency.
pub fn with_latency(mut config: SimConfig, op: Opcode, latency: u64) -> SimConfig {
    let _ = config.latencies.insert(op, latency);
    config
}

/// Seeds one backing-store cell.
pub fn with_cell(mut config: SimConfig, address: usize, value: f64) -> SimConfig {
    config.initial_memory.push(MemoryInit { address, value });
    config
}
