//! Operation catalog.
//!
//! The simulator models a fixed set of operations: immediate integer
//! arithmetic, single- and double-precision floating arithmetic, integer
//! and floating loads/stores, and two-way conditional branches. Each
//! operation carries a default execute latency which configuration may
//! override per run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One operation kind from the fixed catalog.
///
/// Serialized under its assembly mnemonic (`"ADD_D"`, `"L_D"`, …) so
/// configuration and rendered snapshots read like program text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Opcode {
    /// Integer add-immediate.
    #[serde(rename = "DADDI")]
    Daddi,
    /// Integer subtract-immediate.
    #[serde(rename = "DSUBI")]
    Dsubi,
    /// Double-precision floating add.
    #[serde(rename = "ADD_D")]
    AddD,
    /// Single-precision floating add.
    #[serde(rename = "ADD_S")]
    AddS,
    /// Double-precision floating subtract.
    #[serde(rename = "SUB_D")]
    SubD,
    /// Single-precision floating subtract.
    #[serde(rename = "SUB_S")]
    SubS,
    /// Double-precision floating multiply.
    #[serde(rename = "MUL_D")]
    MulD,
    /// Single-precision floating multiply.
    #[serde(rename = "MUL_S")]
    MulS,
    /// Double-precision floating divide.
    #[serde(rename = "DIV_D")]
    DivD,
    /// Single-precision floating divide.
    #[serde(rename = "DIV_S")]
    DivS,
    /// Integer load word.
    #[serde(rename = "LW")]
    Lw,
    /// Integer load doubleword.
    #[serde(rename = "LD")]
    Ld,
    /// Single-precision floating load.
    #[serde(rename = "L_S")]
    LoadS,
    /// Double-precision floating load.
    #[serde(rename = "L_D")]
    LoadD,
    /// Integer store word.
    #[serde(rename = "SW")]
    Sw,
    /// Integer store doubleword.
    #[serde(rename = "SD")]
    Sd,
    /// Single-precision floating store.
    #[serde(rename = "S_S")]
    StoreS,
    /// Double-precision floating store.
    #[serde(rename = "S_D")]
    StoreD,
    /// Branch if equal.
    #[serde(rename = "BEQ")]
    Beq,
    /// Branch if not equal.
    #[serde(rename = "BNE")]
    Bne,
}

impl Opcode {
    /// Every operation in the catalog, in a fixed order.
    pub const ALL: [Self; 20] = [
        Self::Daddi,
        Self::Dsubi,
        Self::AddD,
        Self::AddS,
        Self::SubD,
        Self::SubS,
        Self::MulD,
        Self::MulS,
        Self::DivD,
        Self::DivS,
        Self::Lw,
        Self::Ld,
        Self::LoadS,
        Self::LoadD,
        Self::Sw,
        Self::Sd,
        Self::StoreS,
        Self::StoreD,
        Self::Beq,
        Self::Bne,
    ];

    /// Assembly mnemonic for rendering.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Daddi => "DADDI",
            Self::Dsubi => "DSUBI",
            Self::AddD => "ADD_D",
            Self::AddS => "ADD_S",
            Self::SubD => "SUB_D",
            Self::SubS => "SUB_S",
            Self::MulD => "MUL_D",
            Self::MulS => "MUL_S",
            Self::DivD => "DIV_D",
            Self::DivS => "DIV_S",
            Self::Lw => "LW",
            Self::Ld => "LD",
            Self::LoadS => "L_S",
            Self::LoadD => "L_D",
            Self::Sw => "SW",
            Self::Sd => "SD",
            Self::StoreS => "S_S",
            Self::StoreD => "S_D",
            Self::Beq => "BEQ",
            Self::Bne => "BNE",
        }
    }

    /// Whether this operation reads through the memory system.
    pub const fn is_load(self) -> bool {
        matches!(self, Self::Lw | Self::Ld | Self::LoadS | Self::LoadD)
    }

    /// Whether this operation writes through the memory system.
    pub const fn is_store(self) -> bool {
        matches!(self, Self::Sw | Self::Sd | Self::StoreS | Self::StoreD)
    }

    /// Whether this operation occupies a load/store buffer.
    pub const fn is_memory(self) -> bool {
        self.is_load() || self.is_store()
    }

    /// Whether this operation occupies the branch slot.
    pub const fn is_branch(self) -> bool {
        matches!(self, Self::Beq | Self::Bne)
    }

    /// Whether this operation occupies an arithmetic reservation station.
    pub const fn is_arith(self) -> bool {
        !self.is_memory() && !self.is_branch()
    }

    /// Whether this operation treats its second source as an immediate
    /// and computes with integer semantics.
    pub const fn is_immediate(self) -> bool {
        matches!(self, Self::Daddi | Self::Dsubi)
    }

    /// Default execute latency in cycles, overridable per run.
    pub const fn default_latency(self) -> u64 {
        match self {
            Self::Daddi | Self::Dsubi | Self::Beq | Self::Bne => 1,
            Self::AddD
            | Self::AddS
            | Self::SubD
            | Self::SubS
            | Self::Lw
            | Self::Ld
            | Self::LoadS
            | Self::LoadD
            | Self::Sw
            | Self::Sd
            | Self::StoreS
            | Self::StoreD => 2,
            Self::MulD | Self::MulS => 10,
            Self::DivD | Self::DivS => 40,
        }
    }

    /// Applies the arithmetic semantics of this operation to two ready
    /// operand values. Immediate forms compute with wrapping integer
    /// arithmetic; floating forms use IEEE `f64`. Memory and branch
    /// operations never reach the ALU and yield a NaN poison value.
    pub fn apply(self, vj: f64, vk: f64) -> f64 {
        match self {
            Self::AddD | Self::AddS => vj + vk,
            Self::SubD | Self::SubS => vj - vk,
            Self::MulD | Self::MulS => vj * vk,
            Self::DivD | Self::DivS => vj / vk,
            Self::Daddi => (vj as i64).wrapping_add(vk as i64) as f64,
            Self::Dsubi => (vj as i64).wrapping_sub(vk as i64) as f64,
            _ => f64::NAN,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
