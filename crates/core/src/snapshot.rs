//! Per-cycle state snapshots.
//!
//! After the three stages complete each cycle, the engine captures a
//! fully independent deep copy of every pool, the branch unit, the
//! register file, the bus, the memory system, and the remaining issue
//! queue. Snapshots are value clones: later mutation of live state is
//! never observable through a captured snapshot. The history is
//! append-only and indexed by cycle number.
//!
//! All snapshot types derive `Serialize` so an external presentation
//! layer can render them without touching the live engine.

use crate::core::branch::BranchUnit;
use crate::core::cdb::CommonDataBus;
use crate::core::regfile::Register;
use crate::core::station::Pool;
use crate::isa::Instruction;
use crate::mem::MemorySystem;
use serde::Serialize;

/// One occupied cache line, flattened for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheLineView {
    /// Block index within the cache.
    pub index: usize,
    /// Block tag held at that index.
    pub tag: usize,
    /// Cached datum.
    pub value: f64,
}

/// Memory-system contents at the end of a cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryView {
    /// Backing-store cells in address order.
    pub cells: Vec<f64>,
    /// Occupied cache lines in index order.
    pub lines: Vec<CacheLineView>,
}

impl MemoryView {
    /// Captures the memory system's current contents.
    pub fn capture(memory: &MemorySystem) -> Self {
        Self {
            cells: memory.cells().to_vec(),
            lines: memory
                .cache()
                .lines()
                .map(|(index, line)| CacheLineView {
                    index,
                    tag: line.tag,
                    value: line.value,
                })
                .collect(),
        }
    }
}

/// One not-yet-issued instruction still in the queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueuedInstruction {
    /// Index of the instruction in the full program list.
    pub index: usize,
    /// The instruction itself.
    pub instruction: Instruction,
}

/// Complete simulator state at the end of one cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleSnapshot {
    /// The cycle this snapshot closes.
    pub cycle: u64,
    /// Arithmetic reservation-station pools.
    pub stations: Vec<Pool>,
    /// Load/store buffer pools.
    pub buffers: Vec<Pool>,
    /// The branch unit.
    pub branch: BranchUnit,
    /// The register file contents.
    pub registers: Vec<Register>,
    /// The bus as driven this cycle (empty if no broadcast).
    pub bus: CommonDataBus,
    /// Memory-system contents.
    pub memory: MemoryView,
    /// Remaining issue queue, head first.
    pub queue: Vec<QueuedInstruction>,
    /// Per-program-entry issue cycles (`None` if not yet issued).
    pub issue_cycles: Vec<Option<u64>>,
    /// Whether the completion predicate held at the end of this cycle.
    pub complete: bool,
}
