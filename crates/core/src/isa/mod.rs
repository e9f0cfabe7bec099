//! Instruction catalog and program representation.
//!
//! This module provides:
//! 1. **Opcodes:** The fixed operation catalog (arithmetic, memory, and
//!    two-way conditional branches) with classification helpers and the
//!    default latency table.
//! 2. **Instructions:** The parsed program form the engine consumes —
//!    operation kind, optional destination, and up to two sources.
//!
//! Text parsing is external to this crate; register references stay
//! textual and are resolved against the register file at issue time.

/// Instruction form consumed by the engine.
pub mod instruction;
/// Operation catalog, classification, and latencies.
pub mod opcode;

pub use instruction::{Dest, Instruction, Source};
pub use opcode::Opcode;
