//! Per-cycle pipeline stages.
//!
//! Each stage is an `impl` block on [`crate::core::Engine`], run in a
//! fixed order every cycle:
//! 1. **Issue** — admit at most one instruction from the queue head.
//! 2. **Execute** — schedule windows, advance timers, compute results,
//!    perform memory accesses, resolve the branch.
//! 3. **Write-Result** — arbitrate the bus among completed units and fan
//!    the winning value out to every waiting consumer.

mod execute;
mod issue;
mod write_result;
