//! Issue stage.
//!
//! Attempts to admit the queue's head instruction, at most one per
//! cycle. Nothing issues while a branch is in flight. Resource
//! unavailability — no free slot, or a memory address aliasing a busy
//! buffer — is a stall retried next cycle. A malformed operand is a
//! fatal error: it must surface, never stall silently forever.
//!
//! Renaming happens here: source registers are read as values (no
//! pending producer) or as the producer's tag; a destination register
//! adopts the issuing slot's tag, replacing any prior rename. Stores
//! consume their named register as data and rename nothing.

use crate::common::{Operand, SimError, Tag};
use crate::core::Engine;
use crate::core::station::Slot;
use crate::isa::{Dest, Instruction, Source};
use tracing::{debug, trace};

impl Engine {
    /// Runs the issue stage for the current cycle.
    pub(crate) fn issue(&mut self) -> Result<(), SimError> {
        if self.branch.in_flight() {
            if !self.queue.is_empty() {
                trace!(cycle = self.cycle, "issue stalled behind in-flight branch");
            }
            return Ok(());
        }
        let Some(&index) = self.queue.front() else {
            return Ok(());
        };
        let Some(inst) = self.program.get(index).cloned() else {
            return Ok(());
        };

        let admitted = if inst.op.is_branch() {
            self.issue_branch(index, &inst)?
        } else if inst.op.is_memory() {
            self.issue_memory(index, &inst)?
        } else {
            self.issue_arith(index, &inst)?
        };

        if admitted {
            self.issue_cycles[index] = Some(self.cycle);
            let _ = self.queue.pop_front();
            debug!(cycle = self.cycle, instruction = %inst, "issued");
        }
        Ok(())
    }

    /// Issues a conditional branch into the single branch slot. The
    /// in-flight stall above guarantees the slot is free here.
    fn issue_branch(&mut self, index: usize, inst: &Instruction) -> Result<bool, SimError> {
        let target = match inst.dest {
            Some(Dest::Target(target)) if target <= self.program.len() => target,
            _ => return Err(issue_error(inst, "dest", inst.dest.as_ref())),
        };
        let src1 = self.resolve_source(inst, &inst.src1, "src1")?;
        let src2 = match &inst.src2 {
            Some(src) => self.resolve_source(inst, src, "src2")?,
            None => return Err(issue_error(inst, "src2", None::<&Source>)),
        };
        self.branch.slot = Slot {
            busy: true,
            op: Some(inst.op),
            src1,
            src2,
            issued_at: Some(self.cycle),
            instr: Some(index),
            ..Slot::default()
        };
        self.branch.target = Some(target);
        Ok(true)
    }

    /// Issues a load or store into a free buffer of the matching pool,
    /// unless its address aliases any busy buffer.
    fn issue_memory(&mut self, index: usize, inst: &Instruction) -> Result<bool, SimError> {
        let address = match inst.src1 {
            Source::Imm(addr) if addr >= 0 && (addr as usize) < self.memory.size() => addr as usize,
            _ => return Err(issue_error(inst, "address", Some(&inst.src1))),
        };

        let Some(pool_index) = self
            .buffers
            .iter()
            .position(|pool| pool.op == inst.op && pool.free_index().is_some())
        else {
            trace!(cycle = self.cycle, instruction = %inst, "stall: no free buffer");
            return Ok(false);
        };

        let aliased = self.buffers.iter().any(|pool| {
            pool.slots
                .iter()
                .any(|slot| slot.busy && slot.address == Some(address))
        });
        if aliased {
            trace!(cycle = self.cycle, instruction = %inst, address, "stall: address alias");
            return Ok(false);
        }

        // pool_index came from a successful free-slot probe just above
        let Some(slot_index) = self.buffers[pool_index].free_index() else {
            return Ok(false);
        };
        let tag = Tag::Mem {
            pool: pool_index,
            slot: slot_index,
        };

        let (src1, renames) = if inst.op.is_store() {
            // The destination names the register whose value is stored;
            // it is consumed as data, not renamed.
            match &inst.dest {
                Some(Dest::Reg(name)) => {
                    let data = self.resolve_reg(inst, name, "dest")?;
                    (data, None)
                }
                _ => return Err(issue_error(inst, "dest", inst.dest.as_ref())),
            }
        } else {
            match &inst.dest {
                Some(Dest::Reg(name)) => {
                    let reg = self
                        .regs
                        .resolve(name)
                        .ok_or_else(|| issue_error(inst, "dest", inst.dest.as_ref()))?;
                    (Operand::Ready(0.0), Some(reg))
                }
                _ => return Err(issue_error(inst, "dest", inst.dest.as_ref())),
            }
        };

        self.buffers[pool_index].slots[slot_index] = Slot {
            busy: true,
            op: Some(inst.op),
            src1,
            src2: Operand::Ready(0.0),
            issued_at: Some(self.cycle),
            instr: Some(index),
            address: Some(address),
            ..Slot::default()
        };
        if let Some(reg) = renames {
            self.regs.set_producer(reg, tag);
        }
        Ok(true)
    }

    /// Issues an arithmetic instruction into a free station of the
    /// matching pool.
    fn issue_arith(&mut self, index: usize, inst: &Instruction) -> Result<bool, SimError> {
        let Some(pool_index) = self
            .stations
            .iter()
            .position(|pool| pool.op == inst.op && pool.free_index().is_some())
        else {
            trace!(cycle = self.cycle, instruction = %inst, "stall: no free station");
            return Ok(false);
        };

        let src1 = self.resolve_source(inst, &inst.src1, "src1")?;
        let src2 = match &inst.src2 {
            Some(src) => self.resolve_source(inst, src, "src2")?,
            None => return Err(issue_error(inst, "src2", None::<&Source>)),
        };
        let dest = match &inst.dest {
            Some(Dest::Reg(name)) => self
                .regs
                .resolve(name)
                .ok_or_else(|| issue_error(inst, "dest", inst.dest.as_ref()))?,
            _ => return Err(issue_error(inst, "dest", inst.dest.as_ref())),
        };

        // The probe above guarantees a free slot.
        let Some(slot_index) = self.stations[pool_index].free_index() else {
            return Ok(false);
        };
        let tag = Tag::Alu {
            pool: pool_index,
            slot: slot_index,
        };
        self.stations[pool_index].slots[slot_index] = Slot {
            busy: true,
            op: Some(inst.op),
            src1,
            src2,
            issued_at: Some(self.cycle),
            instr: Some(index),
            ..Slot::default()
        };
        self.regs.set_producer(dest, tag);
        Ok(true)
    }

    /// Resolves one source operand: immediates are ready values,
    /// register references read either the value or the producer tag.
    fn resolve_source(
        &self,
        inst: &Instruction,
        src: &Source,
        field: &'static str,
    ) -> Result<Operand, SimError> {
        match src {
            Source::Imm(value) => Ok(Operand::Ready(*value as f64)),
            Source::Reg(name) => self.resolve_reg(inst, name, field),
        }
    }

    /// Resolves a register reference into a ready value or a wait tag.
    fn resolve_reg(
        &self,
        inst: &Instruction,
        name: &str,
        field: &'static str,
    ) -> Result<Operand, SimError> {
        let index = self.regs.resolve(name).ok_or_else(|| SimError::Issue {
            instruction: inst.to_string(),
            field,
            text: name.to_owned(),
        })?;
        let Some(reg) = self.regs.get(index) else {
            return Err(SimError::Issue {
                instruction: inst.to_string(),
                field,
                text: name.to_owned(),
            });
        };
        Ok(match reg.producer {
            Some(tag) => Operand::Waiting(tag),
            None => Operand::Ready(reg.value),
        })
    }
}

/// Builds the fatal issue error for a malformed field.
fn issue_error<T: std::fmt::Display>(
    inst: &Instruction,
    field: &'static str,
    value: Option<&T>,
) -> SimError {
    SimError::Issue {
        instruction: inst.to_string(),
        field,
        text: value.map_or_else(|| "<missing>".to_owned(), ToString::to_string),
    }
}
