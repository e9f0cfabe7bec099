//! Parsed instruction form.
//!
//! The engine consumes instructions already broken into an operation
//! kind, an optional destination, and up to two sources. Register
//! references stay textual (`"F12"`) and are resolved against the
//! register file when the instruction issues — a reference that fails
//! to resolve is a fatal issue error, not a silent stall.

use super::Opcode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One source operand of an instruction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Source {
    /// A register reference by name, e.g. `"F4"`.
    Reg(String),
    /// A literal immediate or memory address.
    Imm(i64),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reg(name) => f.write_str(name),
            Self::Imm(v) => write!(f, "{v}"),
        }
    }
}

/// The destination field of an instruction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Dest {
    /// A register to rename (arithmetic, loads) or to read as store data.
    Reg(String),
    /// A branch target: index into the full program list.
    Target(usize),
}

impl fmt::Display for Dest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reg(name) => f.write_str(name),
            Self::Target(idx) => write!(f, "@{idx}"),
        }
    }
}

/// One parsed instruction. Immutable once the program is loaded; the
/// engine keeps issue-cycle bookkeeping separately.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Operation kind.
    pub op: Opcode,
    /// Destination register or branch target, if any. Stores name the
    /// register whose value they consume; it is not renamed.
    pub dest: Option<Dest>,
    /// First source operand.
    pub src1: Source,
    /// Second source operand, if the operation takes one.
    pub src2: Option<Source>,
}

impl Instruction {
    /// Creates an instruction from its parsed fields.
    pub const fn new(op: Opcode, dest: Option<Dest>, src1: Source, src2: Option<Source>) -> Self {
        Self {
            op,
            dest,
            src1,
            src2,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op)?;
        if let Some(dest) = &self.dest {
            write!(f, " {dest},")?;
        }
        write!(f, " {}", self.src1)?;
        if let Some(src2) = &self.src2 {
            write!(f, ", {src2}")?;
        }
        Ok(())
    }
}
