//! # Unit Components
//!
//! This module organizes the unit tests by subsystem: configuration,
//! the memory hierarchy, and the scheduling core.

/// Tests for configuration defaults, deserialization, and validation.
pub mod config;
