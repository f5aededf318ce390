// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use super::HashTable;
use crate::{probe::ProbeSequence, slot::Slot, EmptyMarkerScheme};

/// Default number of records a single delete may move backward
/// before leaving a tombstone instead
pub const MAX_REPAIR_SHIFTS: usize = 32;

impl HashTable {
    fn tracks_passes(&self) -> bool {
        self.marker_scheme == EmptyMarkerScheme::ReplaceWithTombstone
    }

    /// Counts `key`, stored at `idx`, as probing through every slot before it.
    pub(super) fn add_trail(&mut self, key: &str, idx: usize) {
        if !self.tracks_passes() {
            return;
        }

        for probed in self.probe_sequence(key).take_while(|&probed| probed != idx) {
            if let Some(count) = self.passes.get_mut(probed) {
                *count += 1;
            }
        }
    }

    /// Stops counting a record as probing through the given slots.
    ///
    /// Tombstones no record probes through anymore become empty.
    pub(super) fn release_trail(&mut self, trail: impl Iterator<Item = usize>) {
        if !self.tracks_passes() {
            return;
        }

        for probed in trail {
            let Some(count) = self.passes.get_mut(probed) else {
                continue;
            };

            debug_assert!(*count > 0, "pass count should not underflow");
            *count = count.saturating_sub(1);

            if *count > 0 {
                continue;
            }

            if let Some(slot) = self.slots.get_mut(probed) {
                if matches!(slot, Slot::Tombstone) {
                    *slot = Slot::Empty;
                    self.deleted -= 1;
                }
            }
        }
    }

    /// Recomputes the pass counts of all slots.
    pub(super) fn recount_passes(&mut self) {
        if !self.tracks_passes() {
            return;
        }

        let mut passes = vec![0; self.capacity()];

        for (idx, slot) in self.slots.iter().enumerate() {
            let Some(entry) = slot.entry() else {
                continue;
            };

            for probed in self
                .probe_sequence(entry.key())
                .take_while(|&probed| probed != idx)
            {
                if let Some(count) = passes.get_mut(probed) {
                    *count += 1;
                }
            }
        }

        self.passes = passes;
    }

    /// Finds a record that may move back into `hole`.
    ///
    /// Scans the cluster following `hole` along `probes` (the probe sequence
    /// of the record that left the hole), up to the next empty slot. Of the
    /// records there whose own probe sequence passes through `hole`, the one
    /// furthest along is returned, together with its probe sequence.
    fn successor_of(
        &self,
        hole: usize,
        probes: ProbeSequence,
    ) -> Option<(usize, ProbeSequence)> {
        probes
            .skip_while(|&probed| probed != hole)
            .skip(1)
            .map_while(|idx| match self.slots.get(idx)? {
                Slot::Empty => None,
                slot => Some((idx, slot)),
            })
            .filter_map(|(idx, slot)| {
                let probes = self.probe_sequence(slot.entry()?.key());

                probes
                    .clone()
                    .take_while(|&probed| probed != idx)
                    .any(|probed| probed == hole)
                    .then_some((idx, probes))
            })
            .last()
    }

    /// Closes the gap left by a deleted record (the hole is already [`Slot::Empty`]).
    ///
    /// `probes` is the probe sequence of the deleted record.
    ///
    /// While some record probes through the hole, a record is moved backward
    /// into the hole and its old slot becomes the new hole. Once no record
    /// probes through the hole it can stay empty.
    ///
    /// If no record to move is found, or the shift budget runs out,
    /// the hole is left as a tombstone.
    pub(super) fn close_gap(&mut self, hole: usize, probes: ProbeSequence) {
        let mut hole = hole;
        let mut probes = probes;
        let mut shifts = 0;

        loop {
            if self.passes.get(hole).is_none_or(|&count| count == 0) {
                log::trace!("Closed gap at slot {hole} after {shifts} shifts");
                return;
            }

            if shifts == self.max_repair_shifts {
                log::debug!(
                    "Could not close gap after {shifts} shifts, leaving tombstone at slot {hole}"
                );
                self.mark_deleted(hole, Slot::Tombstone);
                return;
            }

            let Some((from, next)) = self.successor_of(hole, probes) else {
                log::debug!("Found no record to move into slot {hole}, leaving tombstone");
                self.mark_deleted(hole, Slot::Tombstone);
                return;
            };

            log::trace!("Moving record from slot {from} back into slot {hole}");

            // NOTE: The moved record now ends at the hole, instead of probing through it
            let trail = next
                .clone()
                .skip_while(move |&probed| probed != hole)
                .take_while(move |&probed| probed != from);
            self.release_trail(trail);

            self.slots.swap(from, hole);
            hole = from;
            probes = next;
            shifts += 1;
        }
    }
}
