//! Tomasulo dynamic-scheduling simulator library.
//!
//! This crate implements a cycle-accurate model of Tomasulo's algorithm with the following:
//! 1. **Core:** The engine (Issue → Execute → Write-Result per cycle), renaming
//!    register file, reservation-station and load/store pools, branch unit, and
//!    common data bus.
//! 2. **Memory:** A flat backing store behind a bounded block cache with a global
//!    least-recently-used eviction order.
//! 3. **ISA:** A fixed catalog of arithmetic, memory, and two-way conditional
//!    branch operations with configurable latencies.
//! 4. **Snapshots:** A deep, immutable copy of all machine state captured at the
//!    end of every cycle for external rendering.
//!
//! Text parsing and presentation are external; the engine consumes already-parsed
//! configuration and instruction lists.

/// Common types: errors, tags, operands.
pub mod common;
/// Simulator configuration (defaults, pool shapes, memory geometry, latencies).
pub mod config;
/// Engine, pools, register file, branch unit, and bus.
pub mod core;
/// Instruction catalog and program representation.
pub mod isa;
/// Two-level memory hierarchy.
pub mod mem;
/// Per-cycle state snapshots.
pub mod snapshot;

/// Root configuration type; use `SimConfig::default()` or deserialize from JSON.
pub use crate::config::SimConfig;
/// The simulation engine; construct with `Engine::new`.
pub use crate::core::Engine;
/// Fatal error surface of the engine.
pub use crate::common::SimError;
