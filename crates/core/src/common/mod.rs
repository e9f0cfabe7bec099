//! Common types shared across the simulator core.
//!
//! This module provides:
//! 1. **Errors:** The `SimError` type covering every fatal condition the
//!    engine can surface (issue faults, snapshot lookups, non-termination,
//!    bad configuration).
//! 2. **Tags:** Slot identity (`Tag`) and the operand representation
//!    (`Operand`) used for register renaming and dependency tracking.

/// Fatal error definitions.
pub mod error;
/// Slot identity tags and renamed operand slots.
pub mod tag;

pub use error::SimError;
pub use tag::{Operand, Tag};
