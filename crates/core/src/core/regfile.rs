//! Renaming register file.
//!
//! Maps each register to its current value and, when an in-flight
//! instruction will overwrite it, the tag of that producer. The issue
//! stage reads values or tags from here; the write-result stage fans a
//! broadcast out to every register whose tag matches. A newer rename
//! always replaces an older tag, so a stale producer's broadcast simply
//! finds no matching register and has no observable effect.

use crate::common::Tag;
use serde::Serialize;

/// One renaming register.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Register {
    /// Current architectural value.
    pub value: f64,
    /// Tag of the pending producer, if a rename is outstanding.
    pub producer: Option<Tag>,
}

/// Fixed-size array of renaming registers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterFile {
    registers: Vec<Register>,
}

impl RegisterFile {
    /// Creates a register file of `len` zeroed registers with no
    /// pending producers.
    pub fn new(len: usize) -> Self {
        Self {
            registers: vec![Register::default(); len],
        }
    }

    /// Number of registers.
    pub fn len(&self) -> usize {
        self.registers.len()
    }

    /// Whether the file is empty (configuration forbids this).
    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    /// Resolves a textual register reference (`"F12"`) to its index.
    ///
    /// Accepts a single alphabetic prefix followed by a decimal index
    /// within the file. Returns `None` for anything else — the issue
    /// stage turns that into a fatal error.
    pub fn resolve(&self, name: &str) -> Option<usize> {
        let mut chars = name.chars();
        if !chars.next()?.is_ascii_alphabetic() {
            return None;
        }
        let index: usize = chars.as_str().parse().ok()?;
        (index < self.registers.len()).then_some(index)
    }

    /// The register at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&Register> {
        self.registers.get(index)
    }

    /// Records `tag` as the pending producer of register `index`,
    /// replacing any prior rename (last rename wins).
    pub fn set_producer(&mut self, index: usize, tag: Tag) {
        if let Some(reg) = self.registers.get_mut(index) {
            reg.producer = Some(tag);
        }
    }

    /// Directly sets an architectural value, clearing any pending
    /// producer. Used by tests and scenario setup, not by the stages.
    pub fn write(&mut self, index: usize, value: f64) {
        if let Some(reg) = self.registers.get_mut(index) {
            reg.value = value;
            reg.producer = None;
        }
    }

    /// Fans a broadcast out: every register whose producer tag equals
    /// `tag` adopts `value` and clears its tag. Returns how many
    /// registers were updated.
    pub fn capture(&mut self, tag: Tag, value: f64) -> usize {
        let mut updated = 0;
        for reg in &mut self.registers {
            if reg.producer == Some(tag) {
                reg.value = value;
                reg.producer = None;
                updated += 1;
            }
        }
        updated
    }

    /// Whether any register still waits on a producer.
    pub fn has_pending(&self) -> bool {
        self.registers.iter().any(|reg| reg.producer.is_some())
    }

    /// Number of registers whose producer tag equals `tag`.
    pub fn dependents_of(&self, tag: Tag) -> usize {
        self.registers
            .iter()
            .filter(|reg| reg.producer == Some(tag))
            .count()
    }

    /// Iterates the registers in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Register> {
        self.registers.iter()
    }

    /// Conventional display name for register `index`.
    pub fn name(index: usize) -> String {
        format!("F{index}")
    }
}
