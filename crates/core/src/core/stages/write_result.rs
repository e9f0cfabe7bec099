//! Write-result stage: bus arbitration and fan-out.
//!
//! Exactly one result may use the common data bus per cycle. Candidates
//! are the busy arithmetic and load slots whose execution ended last
//! cycle; completed stores are already durably written and free
//! themselves without competing. The candidate with the strictly
//! greatest dependent count — waiting operand tags plus register
//! producer tags equal to its own — wins; ties go to the earliest slot
//! in fixed enumeration order (station pools in configuration order,
//! then buffer pools, slots by index).
//!
//! The winner's value fans out in the same cycle: matching registers
//! adopt it and clear their tags, waiting operands everywhere become
//! ready, and any slot made fully ready schedules execution from next
//! cycle. The bus stays visible through the snapshot and is emptied
//! before the next cycle's issue stage.

use crate::common::Tag;
use crate::core::Engine;
use tracing::debug;

impl Engine {
    /// Runs the write-result stage for the current cycle.
    pub(crate) fn write_result(&mut self) {
        let Some(prev) = self.cycle.checked_sub(1) else {
            return;
        };

        // Completed stores retire silently.
        for pool in &mut self.buffers {
            if !pool.op.is_store() {
                continue;
            }
            for slot in &mut pool.slots {
                if slot.busy && slot.exec_end == Some(prev) {
                    slot.reset();
                }
            }
        }

        let candidates = self.bus_candidates(prev);
        let mut winner: Option<(Tag, f64, usize)> = None;
        for (tag, value) in candidates {
            let dependents = self.dependents_of(tag);
            // Strict comparison keeps the earliest candidate on ties.
            if winner.is_none_or(|(_, _, best)| dependents > best) {
                winner = Some((tag, value, dependents));
            }
        }

        if let Some((tag, value, dependents)) = winner {
            self.free_slot(tag);
            self.cdb.drive(tag, value);
            debug!(cycle = self.cycle, %tag, value, dependents, "broadcast");
            self.fan_out(tag, value);
        }
    }

    /// Collects completed arithmetic and load slots in the fixed
    /// enumeration order used for tie-breaking. A slot that lost a
    /// previous arbitration stays busy with its window closed, so the
    /// filter is "ended by last cycle", not "ended exactly last cycle".
    fn bus_candidates(&self, prev: u64) -> Vec<(Tag, f64)> {
        let mut candidates = Vec::new();
        for (pool_index, pool) in self.stations.iter().enumerate() {
            for (slot_index, slot) in pool.slots.iter().enumerate() {
                if slot.busy && slot.exec_end.is_some_and(|end| end <= prev) {
                    candidates.push((
                        Tag::Alu {
                            pool: pool_index,
                            slot: slot_index,
                        },
                        slot.result.unwrap_or_default(),
                    ));
                }
            }
        }
        for (pool_index, pool) in self.buffers.iter().enumerate() {
            if !pool.op.is_load() {
                continue;
            }
            for (slot_index, slot) in pool.slots.iter().enumerate() {
                if slot.busy && slot.exec_end.is_some_and(|end| end <= prev) {
                    candidates.push((
                        Tag::Mem {
                            pool: pool_index,
                            slot: slot_index,
                        },
                        slot.result.unwrap_or_default(),
                    ));
                }
            }
        }
        candidates
    }

    /// Dependent count of a candidate: pending operand tags across all
    /// slots plus register producer tags equal to its tag.
    fn dependents_of(&self, tag: Tag) -> usize {
        let stations: usize = self
            .stations
            .iter()
            .flat_map(|pool| &pool.slots)
            .map(|slot| slot.waiting_on(tag))
            .sum();
        let buffers: usize = self
            .buffers
            .iter()
            .flat_map(|pool| &pool.slots)
            .map(|slot| slot.waiting_on(tag))
            .sum();
        stations + buffers + self.branch.slot.waiting_on(tag) + self.regs.dependents_of(tag)
    }

    /// Frees the slot named by `tag` after it won the bus.
    fn free_slot(&mut self, tag: Tag) {
        match tag {
            Tag::Alu { pool, slot } => {
                if let Some(s) = self
                    .stations
                    .get_mut(pool)
                    .and_then(|p| p.slots.get_mut(slot))
                {
                    s.reset();
                }
            }
            Tag::Mem { pool, slot } => {
                if let Some(s) = self
                    .buffers
                    .get_mut(pool)
                    .and_then(|p| p.slots.get_mut(slot))
                {
                    s.reset();
                }
            }
            // The branch slot never broadcasts.
            Tag::Branch => {}
        }
    }

    /// Fans the broadcast out to registers and every waiting operand
    /// slot; slots made fully ready schedule execution from next cycle.
    fn fan_out(&mut self, tag: Tag, value: f64) {
        let cycle = self.cycle;
        let _ = self.regs.capture(tag, value);

        for pool in &mut self.stations {
            let latency = self.config.latency(pool.op);
            for slot in &mut pool.slots {
                if !slot.busy {
                    continue;
                }
                let woke = slot.src1.capture(tag, value) | slot.src2.capture(tag, value);
                if woke && slot.is_ready() && slot.exec_start.is_none() {
                    slot.exec_start = Some(cycle + 1);
                    slot.exec_end = Some(cycle + latency);
                }
            }
        }

        for pool in &mut self.buffers {
            let latency = self.config.latency(pool.op);
            for slot in &mut pool.slots {
                if !slot.busy {
                    continue;
                }
                let woke = slot.src1.capture(tag, value) | slot.src2.capture(tag, value);
                if woke && slot.is_ready() && slot.exec_start.is_none() {
                    let extra = slot.address.map_or(0, |addr| self.memory.latency(addr));
                    slot.exec_start = Some(cycle + 1);
                    slot.exec_end = Some(cycle + latency + extra);
                }
            }
        }

        let branch = &mut self.branch.slot;
        if branch.busy {
            let woke = branch.src1.capture(tag, value) | branch.src2.capture(tag, value);
            if woke && branch.is_ready() && branch.exec_start.is_none() {
                let latency = branch.op.map_or(1, |op| self.config.latency(op));
                branch.exec_start = Some(cycle + 1);
                branch.exec_end = Some(cycle + latency);
            }
        }
    }
}
