//! Common data bus.
//!
//! The single broadcast path between completing units and their
//! consumers. It carries at most one (tag, value) pair per cycle; the
//! engine clears it before the next cycle's issue stage runs, so a
//! broadcast is visible in exactly one snapshot.

use crate::common::Tag;
use serde::Serialize;

/// Single-slot broadcast bus.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CommonDataBus {
    broadcast: Option<(Tag, f64)>,
}

impl CommonDataBus {
    /// Places a (tag, value) pair on the bus. The arbitration stage
    /// guarantees at most one driver per cycle.
    pub fn drive(&mut self, tag: Tag, value: f64) {
        debug_assert!(self.broadcast.is_none(), "bus driven twice in one cycle");
        self.broadcast = Some((tag, value));
    }

    /// The pair currently on the bus, if any.
    pub const fn current(&self) -> Option<(Tag, f64)> {
        self.broadcast
    }

    /// Whether the bus is idle.
    pub const fn is_empty(&self) -> bool {
        self.broadcast.is_none()
    }

    /// Empties the bus at the cycle boundary.
    pub fn clear(&mut self) {
        self.broadcast = None;
    }
}
