//! Simulator error definitions.
//!
//! This module defines the fatal error surface of the core. It distinguishes:
//! 1. **Issue faults:** Malformed operands discovered while admitting an
//!    instruction — these abort the simulation rather than stalling forever.
//! 2. **Query faults:** Snapshot lookups outside the recorded history.
//! 3. **Guard trips:** Exceeding the configured maximum-cycle bound.
//! 4. **Configuration faults:** Inconsistent construction inputs.
//!
//! Resource unavailability (no free slot, an address alias, an in-flight
//! branch) is a recoverable stall, not an error, and never appears here.

use thiserror::Error;

/// Errors surfaced by the simulation engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// An instruction reached the issue stage with an operand the engine
    /// cannot interpret (unparseable or out-of-range register reference,
    /// missing address, address beyond the backing store).
    #[error("cannot issue `{instruction}`: malformed {field} operand `{text}`")]
    Issue {
        /// Rendered form of the offending instruction.
        instruction: String,
        /// Which field was malformed (`"src1"`, `"src2"`, `"dest"`, `"address"`).
        field: &'static str,
        /// The offending operand text.
        text: String,
    },

    /// A snapshot was requested for a cycle that was never recorded.
    #[error("no snapshot recorded for cycle {cycle} (history covers 1..={recorded})")]
    Snapshot {
        /// The requested cycle number.
        cycle: u64,
        /// Number of cycles currently recorded.
        recorded: u64,
    },

    /// The program failed to complete within the configured cycle guard.
    #[error("no completion after {limit} cycles; aborting run")]
    NonTermination {
        /// The configured maximum-cycle bound.
        limit: u64,
    },

    /// The construction inputs are inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),
}
