//! Simulation engine: clock, scheduler, and owned machine state.
//!
//! One [`Engine`] owns every mutable piece of the modeled machine — the
//! reservation-station and load/store pools, the branch unit, the
//! register file, the common data bus, and the memory system. Each call
//! to [`Engine::step`] drives one discrete cycle through Issue →
//! Execute → Write-Result, applies any branch redirect at the stage
//! boundary, and appends an immutable snapshot to the history.
//!
//! The engine is strictly sequential; callers must serialize `step`
//! calls. No state lives outside the engine instance.

/// Single-slot branch unit.
pub mod branch;
/// Common data bus.
pub mod cdb;
/// Renaming register file.
pub mod regfile;
/// Unit slots and pools.
pub mod station;

mod stages;

use crate::common::SimError;
use crate::config::SimConfig;
use crate::isa::Instruction;
use crate::mem::MemorySystem;
use crate::snapshot::{CycleSnapshot, MemoryView, QueuedInstruction};
use branch::BranchUnit;
use cdb::CommonDataBus;
use regfile::RegisterFile;
use station::Pool;
use std::collections::VecDeque;
use tracing::debug;

/// The Tomasulo scheduling engine.
///
/// Construct with [`Engine::new`], then drive with [`Engine::step`] or
/// [`Engine::run_to_completion`] and inspect per-cycle state through
/// [`Engine::snapshot`].
#[derive(Debug)]
pub struct Engine {
    config: SimConfig,
    /// Full program, immutable; the branch unit redirects into it.
    program: Vec<Instruction>,
    /// Issue-cycle bookkeeping, parallel to `program`.
    issue_cycles: Vec<Option<u64>>,
    /// Indices of not-yet-issued instructions, head first. A taken
    /// branch replaces this wholesale with a program suffix.
    queue: VecDeque<usize>,
    stations: Vec<Pool>,
    buffers: Vec<Pool>,
    branch: BranchUnit,
    regs: RegisterFile,
    cdb: CommonDataBus,
    memory: MemorySystem,
    cycle: u64,
    /// Branch redirect staged by Execute, applied between stages.
    redirect: Option<usize>,
    history: Vec<CycleSnapshot>,
}

impl Engine {
    /// Creates an engine from validated configuration and a parsed
    /// program.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the configuration is internally
    /// inconsistent.
    pub fn new(config: SimConfig, program: Vec<Instruction>) -> Result<Self, SimError> {
        config.validate()?;
        let memory = Self::build_memory(&config);
        let queue = (0..program.len()).collect();
        let issue_cycles = vec![None; program.len()];
        Ok(Self {
            stations: Self::build_pools(&config.stations),
            buffers: Self::build_pools(&config.buffers),
            branch: BranchUnit::default(),
            regs: RegisterFile::new(config.registers),
            cdb: CommonDataBus::default(),
            memory,
            cycle: 0,
            redirect: None,
            history: Vec::new(),
            issue_cycles,
            queue,
            program,
            config,
        })
    }

    fn build_pools(configs: &[crate::config::PoolConfig]) -> Vec<Pool> {
        configs
            .iter()
            .map(|pool| Pool::new(pool.op, pool.capacity))
            .collect()
    }

    fn build_memory(config: &SimConfig) -> MemorySystem {
        let mut memory = MemorySystem::new(&config.memory);
        for seed in &config.initial_memory {
            memory.seed(seed.address, seed.value);
        }
        memory
    }

    /// Advances the machine by exactly one cycle. A no-op once the
    /// completion predicate holds.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Issue`] for a malformed operand reaching the
    /// issue stage, or [`SimError::NonTermination`] when the cycle guard
    /// trips before completion.
    pub fn step(&mut self) -> Result<(), SimError> {
        if self.is_complete() {
            return Ok(());
        }
        if self.cycle >= self.config.max_cycles {
            return Err(SimError::NonTermination {
                limit: self.config.max_cycles,
            });
        }
        self.cycle += 1;
        self.cdb.clear();
        self.issue()?;
        self.execute();
        self.write_result();
        self.apply_redirect();
        self.capture();
        Ok(())
    }

    /// Steps until the completion predicate holds.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`Engine::step`].
    pub fn run_to_completion(&mut self) -> Result<(), SimError> {
        while !self.is_complete() {
            self.step()?;
        }
        Ok(())
    }

    /// Whether the machine has drained: empty issue queue, no busy
    /// station or buffer, no in-flight branch, and no register waiting
    /// on a producer.
    pub fn is_complete(&self) -> bool {
        self.queue.is_empty()
            && self.stations.iter().all(Pool::is_idle)
            && self.buffers.iter().all(Pool::is_idle)
            && !self.branch.in_flight()
            && !self.regs.has_pending()
    }

    /// The number of completed cycles.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// The snapshot recorded at the end of `cycle` (1-based).
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Snapshot`] if that cycle was never recorded.
    pub fn snapshot(&self, cycle: u64) -> Result<&CycleSnapshot, SimError> {
        let recorded = self.history.len() as u64;
        if cycle == 0 || cycle > recorded {
            return Err(SimError::Snapshot { cycle, recorded });
        }
        self.history
            .get(cycle as usize - 1)
            .ok_or(SimError::Snapshot { cycle, recorded })
    }

    /// All snapshots recorded so far, in cycle order.
    pub fn history(&self) -> &[CycleSnapshot] {
        &self.history
    }

    /// The register file.
    pub const fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    /// Convenience lookup of a register's current value by name.
    pub fn register_value(&self, name: &str) -> Option<f64> {
        let index = self.regs.resolve(name)?;
        self.regs.get(index).map(|reg| reg.value)
    }

    /// Seeds a register's architectural value before (or between) runs,
    /// clearing any pending producer. Returns `false` for a reference
    /// that does not resolve. [`Engine::reset`] zeroes seeded values.
    pub fn set_register(&mut self, name: &str, value: f64) -> bool {
        match self.regs.resolve(name) {
            Some(index) => {
                self.regs.write(index, value);
                true
            }
            None => false,
        }
    }

    /// The memory system.
    pub const fn memory(&self) -> &MemorySystem {
        &self.memory
    }

    /// The immutable program list.
    pub fn program(&self) -> &[Instruction] {
        &self.program
    }

    /// Clears all mutable state back to the configured initial
    /// condition, including the recorded history.
    pub fn reset(&mut self) {
        self.stations = Self::build_pools(&self.config.stations);
        self.buffers = Self::build_pools(&self.config.buffers);
        self.branch = BranchUnit::default();
        self.regs = RegisterFile::new(self.config.registers);
        self.cdb = CommonDataBus::default();
        self.memory = Self::build_memory(&self.config);
        self.queue = (0..self.program.len()).collect();
        self.issue_cycles = vec![None; self.program.len()];
        self.cycle = 0;
        self.redirect = None;
        self.history.clear();
    }

    /// Applies a staged branch redirect: the remaining queue is
    /// discarded and replaced by the program suffix at the target.
    /// Runs strictly between stages, never mid-issue.
    fn apply_redirect(&mut self) {
        if let Some(target) = self.redirect.take() {
            self.queue = (target..self.program.len()).collect();
            debug!(cycle = self.cycle, target, "branch redirect applied");
        }
    }

    /// Captures the end-of-cycle snapshot.
    fn capture(&mut self) {
        let snapshot = CycleSnapshot {
            cycle: self.cycle,
            stations: self.stations.clone(),
            buffers: self.buffers.clone(),
            branch: self.branch.clone(),
            registers: self.regs.iter().copied().collect(),
            bus: self.cdb,
            memory: MemoryView::capture(&self.memory),
            queue: self
                .queue
                .iter()
                .filter_map(|&index| {
                    self.program.get(index).map(|instruction| QueuedInstruction {
                        index,
                        instruction: instruction.clone(),
                    })
                })
                .collect(),
            issue_cycles: self.issue_cycles.clone(),
            complete: self.is_complete(),
        };
        self.history.push(snapshot);
    }
}
