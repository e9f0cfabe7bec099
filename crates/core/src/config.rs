//! Configuration system for the scheduling simulator.
//!
//! This module defines all configuration structures used to parameterize
//! a simulation. It provides:
//! 1. **Defaults:** Baseline hardware constants (pool shapes, cache
//!    geometry, latencies, the cycle guard).
//! 2. **Structures:** Hierarchical config for unit pools, the memory
//!    system, the register file, and per-operation latencies.
//! 3. **Validation:** Consistency checks performed at engine
//!    construction, surfaced as [`SimError::Config`].
//!
//! Configuration is supplied already parsed — typically deserialized
//! from JSON by an external input layer — or via `SimConfig::default()`.

use crate::common::SimError;
use crate::isa::Opcode;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Default configuration constants for the simulator.
mod defaults {
    /// Default register-file size.
    pub const REGISTERS: usize = 32;

    /// Default total cache size in data cells.
    pub const CACHE_SIZE: usize = 1024;

    /// Default cache block size in data cells.
    pub const BLOCK_SIZE: usize = 64;

    /// Default cache hit latency in cycles.
    pub const HIT_LATENCY: u64 = 1;

    /// Default cache miss penalty in cycles.
    pub const MISS_PENALTY: u64 = 10;

    /// Default backing-store size in data cells.
    pub const MEMORY_SIZE: usize = 256;

    /// Default maximum-cycle guard.
    ///
    /// Bounds pathological programs (a branch loop whose condition never
    /// clears) so a run surfaces non-termination instead of spinning.
    pub const MAX_CYCLES: u64 = 10_000;
}

/// Shape of one unit pool: how many slots it has and which operation
/// kind its slots accept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PoolConfig {
    /// Number of slots in the pool.
    pub capacity: usize,
    /// Operation kind served by every slot in the pool.
    pub op: Opcode,
}

/// Memory-system geometry and timing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Total cache size in data cells.
    pub cache_size: usize,
    /// Cache block size in data cells.
    pub block_size: usize,
    /// Latency of a cache hit, in cycles.
    pub hit_latency: u64,
    /// Latency of a cache miss, in cycles.
    pub miss_penalty: u64,
    /// Backing-store size in data cells.
    pub memory_size: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            cache_size: defaults::CACHE_SIZE,
            block_size: defaults::BLOCK_SIZE,
            hit_latency: defaults::HIT_LATENCY,
            miss_penalty: defaults::MISS_PENALTY,
            memory_size: defaults::MEMORY_SIZE,
        }
    }
}

/// One seeded backing-store cell. The backing store is zero-filled and
/// then overwritten with these, keeping runs deterministic.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MemoryInit {
    /// Cell address.
    pub address: usize,
    /// Initial value.
    pub value: f64,
}

/// Root simulation configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Arithmetic reservation-station pools, in configuration order.
    pub stations: Vec<PoolConfig>,
    /// Load/store buffer pools, in configuration order.
    pub buffers: Vec<PoolConfig>,
    /// Memory-system geometry and timing.
    pub memory: MemoryConfig,
    /// Register-file size.
    pub registers: usize,
    /// Per-operation execute latency overrides.
    pub latencies: BTreeMap<Opcode, u64>,
    /// Seeded backing-store cells.
    pub initial_memory: Vec<MemoryInit>,
    /// Maximum-cycle guard; a run that exceeds it fails with
    /// [`SimError::NonTermination`].
    pub max_cycles: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            stations: vec![
                PoolConfig { capacity: 3, op: Opcode::AddD },
                PoolConfig { capacity: 2, op: Opcode::SubD },
                PoolConfig { capacity: 2, op: Opcode::MulD },
                PoolConfig { capacity: 2, op: Opcode::DivD },
                PoolConfig { capacity: 1, op: Opcode::Daddi },
            ],
            buffers: vec![
                PoolConfig { capacity: 2, op: Opcode::LoadD },
                PoolConfig { capacity: 2, op: Opcode::StoreD },
            ],
            memory: MemoryConfig::default(),
            registers: defaults::REGISTERS,
            latencies: Opcode::ALL
                .into_iter()
                .map(|op| (op, op.default_latency()))
                .collect(),
            initial_memory: Vec::new(),
            max_cycles: defaults::MAX_CYCLES,
        }
    }
}

impl SimConfig {
    /// Execute latency for an operation: the configured override, or the
    /// catalog default.
    pub fn latency(&self, op: Opcode) -> u64 {
        self.latencies
            .get(&op)
            .copied()
            .unwrap_or_else(|| op.default_latency())
    }

    /// Checks internal consistency. Called once at engine construction.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.registers == 0 {
            return Err(SimError::Config("register file must not be empty".into()));
        }
        if self.memory.block_size == 0 {
            return Err(SimError::Config("cache block size must not be zero".into()));
        }
        if self.memory.block_size > self.memory.cache_size {
            return Err(SimError::Config(format!(
                "cache block size {} exceeds cache size {}",
                self.memory.block_size, self.memory.cache_size
            )));
        }
        if self.memory.memory_size == 0 {
            return Err(SimError::Config("backing store must not be empty".into()));
        }
        if self.max_cycles == 0 {
            return Err(SimError::Config("cycle guard must not be zero".into()));
        }
        // A zero-length window would close in the cycle it is scheduled,
        // before the execute stage can ever compute the result.
        for (op, latency) in &self.latencies {
            if *latency == 0 {
                return Err(SimError::Config(format!("zero latency for {op}")));
            }
        }
        for pool in &self.stations {
            if !pool.op.is_arith() {
                return Err(SimError::Config(format!(
                    "station pool for {} must serve an arithmetic operation",
                    pool.op
                )));
            }
            if pool.capacity == 0 {
                return Err(SimError::Config(format!("empty station pool for {}", pool.op)));
            }
        }
        for pool in &self.buffers {
            if !pool.op.is_memory() {
                return Err(SimError::Config(format!(
                    "buffer pool for {} must serve a memory operation",
                    pool.op
                )));
            }
            if pool.capacity == 0 {
                return Err(SimError::Config(format!("empty buffer pool for {}", pool.op)));
            }
        }
        for seed in &self.initial_memory {
            if seed.address >= self.memory.memory_size {
                return Err(SimError::Config(format!(
                    "initial memory cell {} is outside the backing store (size {})",
                    seed.address, self.memory.memory_size
                )));
            }
        }
        Ok(())
    }
}
