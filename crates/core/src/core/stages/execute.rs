//! Execute stage.
//!
//! Scans every busy slot each cycle. A slot whose operands just became
//! ready gets its execution window scheduled to start next cycle; a slot
//! whose window ends this cycle produces its effect: arithmetic results,
//! loads reading through the memory system, stores writing through it.
//! Memory windows are widened by the memory system's latency for the
//! target address, sized without mutating cache state.
//!
//! The branch resolves here, one cycle after its operands are ready: if
//! taken, a redirect to its target is staged for the stage boundary;
//! either way the slot clears and issuance unblocks.

use crate::core::Engine;
use tracing::debug;

impl Engine {
    /// Runs the execute stage for the current cycle.
    pub(crate) fn execute(&mut self) {
        let cycle = self.cycle;

        for pool in &mut self.stations {
            let op = pool.op;
            let latency = self.config.latency(op);
            for slot in &mut pool.slots {
                if !slot.is_ready() {
                    continue;
                }
                if slot.exec_start.is_none() {
                    slot.exec_start = Some(cycle + 1);
                    slot.exec_end = Some(cycle + latency);
                } else if slot.exec_end == Some(cycle) {
                    let vj = slot.src1.value().unwrap_or_default();
                    let vk = slot.src2.value().unwrap_or_default();
                    slot.result = Some(op.apply(vj, vk));
                }
            }
        }

        for pool in &mut self.buffers {
            let op = pool.op;
            let latency = self.config.latency(op);
            for slot in &mut pool.slots {
                if !slot.is_ready() {
                    continue;
                }
                let Some(address) = slot.address else {
                    continue;
                };
                if slot.exec_start.is_none() {
                    slot.exec_start = Some(cycle + 1);
                    slot.exec_end = Some(cycle + latency + self.memory.latency(address));
                } else if slot.exec_end == Some(cycle) {
                    if op.is_load() {
                        slot.result = Some(self.memory.read(address));
                    } else {
                        let value = slot.src1.value().unwrap_or_default();
                        self.memory.write(address, value);
                    }
                }
            }
        }

        self.execute_branch(cycle);
    }

    /// Schedules and resolves the in-flight branch, if any.
    fn execute_branch(&mut self, cycle: u64) {
        if !self.branch.slot.is_ready() {
            return;
        }
        if self.branch.slot.exec_start.is_none() {
            let latency = self
                .branch
                .slot
                .op
                .map_or(1, |op| self.config.latency(op));
            self.branch.slot.exec_start = Some(cycle + 1);
            self.branch.slot.exec_end = Some(cycle + latency);
        } else if self.branch.slot.exec_end == Some(cycle) {
            if self.branch.taken() == Some(true) {
                self.redirect = self.branch.target;
                debug!(cycle, target = ?self.branch.target, "branch taken");
            } else {
                debug!(cycle, "branch not taken");
            }
            self.branch.reset();
        }
    }
}
