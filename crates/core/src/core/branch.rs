//! Single-slot branch unit.
//!
//! Exactly one conditional branch may be in flight system-wide. While it
//! is, the whole pipeline stalls at issue; resolution happens in the
//! execute stage one cycle after both compare operands are ready. A
//! taken branch discards the remaining issue queue and redirects to the
//! program suffix at its target index. The branch slot never competes
//! for the common data bus.

use crate::isa::Opcode;

use super::station::Slot;
use serde::Serialize;

/// The system-wide branch slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BranchUnit {
    /// Operand and timing state, shared shape with station slots.
    pub slot: Slot,
    /// Program index to redirect to if the branch is taken.
    pub target: Option<usize>,
}

impl BranchUnit {
    /// Whether a branch is currently in flight.
    pub const fn in_flight(&self) -> bool {
        self.slot.busy
    }

    /// Evaluates the branch condition over its two ready operand values.
    /// Returns `None` while either operand is still pending.
    pub fn taken(&self) -> Option<bool> {
        let vj = self.slot.src1.value()?;
        let vk = self.slot.src2.value()?;
        match self.slot.op {
            Some(Opcode::Beq) => Some((vj - vk).abs() < f64::EPSILON),
            Some(Opcode::Bne) => Some((vj - vk).abs() >= f64::EPSILON),
            _ => None,
        }
    }

    /// Frees the slot and clears the target.
    pub fn reset(&mut self) {
        self.slot.reset();
        self.target = None;
    }
}
