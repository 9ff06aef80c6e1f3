//! Map-reduce master for the transition-time histogram.
//!
//! Units are split into contiguous shards, one per worker. Each worker builds
//! a private [`PairHistogram`]; the partials are combined by element-wise
//! addition, so the result does not depend on shard boundaries or scheduling.

use super::histogram::{DayBuckets, ElapsedPolicy, PairHistogram};
use super::result_set::ResultSet;
use crate::model::{StepOrder, UnitRecord};
use crate::utils::config::{DEFAULT_BUCKET_BOUNDARY, DEFAULT_WORKERS};
use chrono::NaiveDateTime;
use log::{debug, info};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::time::Instant;

/// Aggregation knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Worker pool size
    pub workers: usize,

    /// Exact-day buckets before overflow
    pub bucket_boundary: usize,

    pub elapsed_policy: ElapsedPolicy,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            bucket_boundary: DEFAULT_BUCKET_BOUNDARY,
            elapsed_policy: ElapsedPolicy::default(),
        }
    }
}

/// Counters describing an aggregation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub units: usize,

    /// (unit, pair) observations counted into the histogram
    pub observations: u64,

    /// Transitions between distinct steps where the later step is at or
    /// before the earlier one
    pub non_positive: u64,

    /// Of those, how many were left out under `ElapsedPolicy::Skip`
    pub skipped: u64,
}

impl AggregateStats {
    fn merge(&mut self, other: &AggregateStats) {
        self.units += other.units;
        self.observations += other.observations;
        self.non_positive += other.non_positive;
        self.skipped += other.skipped;
    }
}

/// Result of a master run
#[derive(Debug, Clone)]
pub struct Aggregate {
    pub result: ResultSet,
    pub stats: AggregateStats,
}

/// Worker-local partial result
struct Partial {
    histogram: PairHistogram,
    stats: AggregateStats,
}

impl Partial {
    fn empty(pairs: usize, buckets: DayBuckets) -> Self {
        Self {
            histogram: PairHistogram::new(pairs, buckets),
            stats: AggregateStats::default(),
        }
    }

    fn combine(mut self, other: Partial) -> Partial {
        self.histogram.merge(&other.histogram);
        self.stats.merge(&other.stats);
        self
    }
}

/// Map-reduce master
#[derive(Debug, Clone, Default)]
pub struct Master {
    options: AggregateOptions,
}

impl Master {
    pub fn new(options: AggregateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AggregateOptions {
        &self.options
    }

    /// Compute the result set for `units`
    ///
    /// **Public** - aggregation phase entry point
    ///
    /// # Errors
    /// `rayon::ThreadPoolBuildError` if the worker pool cannot be started
    pub fn run(
        &self,
        units: &[UnitRecord],
        order: &StepOrder,
    ) -> Result<Aggregate, rayon::ThreadPoolBuildError> {
        let start = Instant::now();
        let workers = self.options.workers.max(1);
        let buckets = DayBuckets::new(self.options.bucket_boundary);
        let pairs = order.pair_count();

        let shard_len = units.len().div_ceil(workers).max(1);
        info!(
            "Aggregating {} units over {} step pairs with {} workers ({} units per shard)",
            units.len(),
            pairs,
            workers,
            shard_len
        );

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("aggregate-{}", i))
            .build()?;

        let policy = self.options.elapsed_policy;
        let partial = pool.install(|| {
            units
                .par_chunks(shard_len)
                .map(|shard| map_shard(shard, order, pairs, buckets, policy))
                .reduce(|| Partial::empty(pairs, buckets), Partial::combine)
        });

        debug!(
            "Aggregation finished in {:.2}s: {} observations, {} non-positive",
            start.elapsed().as_secs_f64(),
            partial.stats.observations,
            partial.stats.non_positive
        );

        Ok(Aggregate {
            result: ResultSet::from_histogram(order, &partial.histogram),
            stats: partial.stats,
        })
    }
}

/// Map step: histogram of one shard
fn map_shard(
    shard: &[UnitRecord],
    order: &StepOrder,
    pairs: usize,
    buckets: DayBuckets,
    policy: ElapsedPolicy,
) -> Partial {
    let mut partial = Partial::empty(pairs, buckets);
    let mut timeline: Vec<(usize, NaiveDateTime)> = Vec::with_capacity(order.len());

    for unit in shard {
        partial.stats.units += 1;
        unit_timeline(unit, order, &mut timeline);

        for (a, &(from, from_at)) in timeline.iter().enumerate() {
            for &(to, to_at) in &timeline[a..] {
                if from != to && to_at <= from_at {
                    partial.stats.non_positive += 1;
                    if policy == ElapsedPolicy::Skip {
                        partial.stats.skipped += 1;
                        continue;
                    }
                }
                let days = (to_at - from_at).num_days();
                partial.histogram.record(order.pair_index(from, to), days);
                partial.stats.observations += 1;
            }
        }
    }

    partial
}

/// Fill `timeline` with the unit's (canonical position, completed_at), sorted
/// by position. Steps outside the canonical order are ignored.
fn unit_timeline(unit: &UnitRecord, order: &StepOrder, timeline: &mut Vec<(usize, NaiveDateTime)>) {
    timeline.clear();
    timeline.extend(
        unit.steps()
            .filter_map(|step| order.position(step.name()).map(|pos| (pos, step.completed_at()))),
    );
    timeline.sort_unstable_by_key(|&(pos, _)| pos);
}
