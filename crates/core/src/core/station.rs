//! Unit slots and pools.
//!
//! A `Slot` holds one in-flight instruction's operands, timing window,
//! and result — the same shape serves arithmetic reservation stations
//! and load/store buffers (memory slots additionally carry an address;
//! a store's data operand travels in `src1`). A `Pool` groups the slots
//! that serve one operation kind, in configuration order.
//!
//! Invariant: `busy` is equivalent to "holds exactly one in-flight
//! instruction"; `reset` returns every field to the cleared state.

use crate::common::{Operand, Tag};
use crate::isa::Opcode;
use serde::Serialize;

/// One reservation station or load/store buffer slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Slot {
    /// Whether the slot holds an in-flight instruction.
    pub busy: bool,
    /// Operation kind of the held instruction.
    pub op: Option<Opcode>,
    /// First source operand (for stores, the data to be written).
    pub src1: Operand,
    /// Second source operand.
    pub src2: Operand,
    /// Computed result, present once execution has ended.
    pub result: Option<f64>,
    /// First cycle of the execution window.
    pub exec_start: Option<u64>,
    /// Last cycle of the execution window.
    pub exec_end: Option<u64>,
    /// Cycle at which the instruction was issued to this slot.
    pub issued_at: Option<u64>,
    /// Index of the held instruction in the program list.
    pub instr: Option<usize>,
    /// Target address, memory slots only.
    pub address: Option<usize>,
}

impl Slot {
    /// Clears every field back to the free state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether both operands hold values and the slot can execute.
    pub fn is_ready(&self) -> bool {
        self.busy && self.src1.is_ready() && self.src2.is_ready()
    }

    /// Number of this slot's pending operands waiting on `tag`.
    pub fn waiting_on(&self, tag: Tag) -> usize {
        usize::from(self.src1.pending() == Some(tag)) + usize::from(self.src2.pending() == Some(tag))
    }
}

/// A group of identical slots serving one operation kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pool {
    /// Operation kind served by this pool.
    pub op: Opcode,
    /// The slots, in index order.
    pub slots: Vec<Slot>,
}

impl Pool {
    /// Creates a pool of `capacity` free slots for `op`.
    pub fn new(op: Opcode, capacity: usize) -> Self {
        Self {
            op,
            slots: vec![Slot::default(); capacity],
        }
    }

    /// Index of the first free slot, if any.
    pub fn free_index(&self) -> Option<usize> {
        self.slots.iter().position(|slot| !slot.busy)
    }

    /// Whether no slot is busy.
    pub fn is_idle(&self) -> bool {
        self.slots.iter().all(|slot| !slot.busy)
    }
}
