//! # Shared Test Infrastructure
//!
//! Helpers used across the suite: instruction and configuration
//! builders, and an engine harness with history-scanning utilities.

/// Instruction and configuration builders.
pub mod builders;

/// Engine construction and history-scanning helpers.
pub mod harness;
