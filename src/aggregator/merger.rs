//! Fold partial unit records into one complete record per serial number.
//!
//! The merger is the single owner of the unit map. It runs on the calling
//! thread after ingestion has finished, so no locking is involved.

use crate::ingest::PartialBatch;
use crate::model::{DuplicatePolicy, StepUpdate, UnitRecord};
use log::{debug, warn};
use std::collections::HashMap;

/// Counters describing a merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub batches: usize,
    pub partial_records: usize,
    pub units: usize,
    /// Re-observed (serial, step) pairs with differing timestamps
    pub conflicts: usize,
}

/// Single-threaded reducer over partial batches
#[derive(Debug)]
pub struct Merger {
    policy: DuplicatePolicy,
    units: HashMap<String, UnitRecord>,
    stats: MergeStats,
}

impl Merger {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            units: HashMap::new(),
            stats: MergeStats::default(),
        }
    }

    /// Fold one batch into the unit map
    pub fn absorb(&mut self, batch: PartialBatch) {
        debug!(
            "Merging {} partial records for step '{}'",
            batch.units.len(),
            batch.step_name
        );
        self.stats.batches += 1;

        for (serial, partial) in batch.units {
            self.stats.partial_records += 1;
            match self.units.get_mut(&serial) {
                None => {
                    self.units.insert(serial, partial);
                }
                Some(unit) => {
                    for step in partial.into_steps() {
                        let step_name = step.name().to_string();
                        if unit.set_step(step, self.policy) == StepUpdate::Conflict {
                            self.stats.conflicts += 1;
                            warn!(
                                "Serial '{}' has conflicting records for step '{}' ({:?})",
                                serial, step_name, self.policy
                            );
                        }
                    }
                }
            }
        }
    }

    /// Complete records keyed by serial number
    pub fn into_unit_map(self) -> HashMap<String, UnitRecord> {
        self.units
    }

    /// Flatten into an unordered unit list
    pub fn finish(self) -> (Vec<UnitRecord>, MergeStats) {
        let mut stats = self.stats;
        stats.units = self.units.len();
        (self.units.into_values().collect(), stats)
    }
}

/// Merge every batch into complete unit records
///
/// **Public** - merge phase entry point
pub fn merge_batches(
    batches: impl IntoIterator<Item = PartialBatch>,
    policy: DuplicatePolicy,
) -> (Vec<UnitRecord>, MergeStats) {
    let mut merger = Merger::new(policy);
    for batch in batches {
        merger.absorb(batch);
    }
    merger.finish()
}
