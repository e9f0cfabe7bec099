//! Slot identity tags and renamed operand slots.
//!
//! A `Tag` names the unit slot that will produce a value: an arithmetic
//! reservation station, a load/store buffer, or the single branch slot.
//! Tags replace register values during renaming, so "who produces this"
//! is a direct equality check instead of a string comparison.
//!
//! An `Operand` is one source slot of an in-flight instruction: either a
//! captured value (ready) or a tag it is still waiting on. There is no
//! sentinel value — readiness is exhaustive by construction.

use serde::Serialize;
use std::fmt;

/// Identity of a unit slot, stable for the slot's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Tag {
    /// An arithmetic reservation station: pool position and slot index.
    Alu {
        /// Index of the pool in configuration order.
        pool: usize,
        /// Slot index within the pool.
        slot: usize,
    },
    /// A load/store buffer: pool position and slot index.
    Mem {
        /// Index of the pool in configuration order.
        pool: usize,
        /// Slot index within the pool.
        slot: usize,
    },
    /// The single system-wide branch slot.
    Branch,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alu { pool, slot } => write!(f, "A{pool}.{slot}"),
            Self::Mem { pool, slot } => write!(f, "M{pool}.{slot}"),
            Self::Branch => write!(f, "BR"),
        }
    }
}

/// One source operand slot of an in-flight instruction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum Operand {
    /// The value has been captured; the operand is ready.
    Ready(f64),
    /// Waiting on the broadcast of the named producer slot.
    Waiting(Tag),
}

impl Default for Operand {
    fn default() -> Self {
        Self::Ready(0.0)
    }
}

impl Operand {
    /// Whether the operand holds a value.
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The captured value, if ready.
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Ready(v) => Some(*v),
            Self::Waiting(_) => None,
        }
    }

    /// The pending producer, if still waiting.
    pub const fn pending(&self) -> Option<Tag> {
        match self {
            Self::Ready(_) => None,
            Self::Waiting(t) => Some(*t),
        }
    }

    /// Adopts a broadcast value if this operand is waiting on `tag`.
    /// Returns `true` if the operand became ready as a result.
    pub fn capture(&mut self, tag: Tag, value: f64) -> bool {
        if *self == Self::Waiting(tag) {
            *self = Self::Ready(value);
            true
        } else {
            false
        }
    }
}
