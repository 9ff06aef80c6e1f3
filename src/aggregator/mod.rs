//! Merge and aggregation of unit records into the transition-time histogram.
//!
//! This module handles:
//! - Folding partial unit records into complete histories (merger)
//! - Elapsed-day bucketing (histogram)
//! - Parallel map-reduce over units (master)
//! - The final per-pair result set

pub mod histogram;
pub mod master;
pub mod merger;
pub mod result_set;

// Re-export main types and functions
pub use histogram::{DayBuckets, ElapsedPolicy, PairHistogram};
pub use master::{Aggregate, AggregateOptions, AggregateStats, Master};
pub use merger::{merge_batches, MergeStats, Merger};
pub use result_set::ResultSet;
