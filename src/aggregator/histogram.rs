//! Elapsed-day buckets and the per-pair bucket histogram.
//!
//! Bucket `i` (0-based) holds transitions of `i + 1` whole days for
//! `i < boundary`; the last bucket holds everything above `boundary`.

use serde::{Deserialize, Serialize};

/// What to do with a transition whose later step is not after the earlier one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ElapsedPolicy {
    /// Count it as a 1-day transition
    #[default]
    FoldIntoFirst,
    /// Leave it out of the histogram and count it separately
    Skip,
}

/// Day bucket layout for a given boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBuckets {
    boundary: usize,
}

impl DayBuckets {
    pub fn new(boundary: usize) -> Self {
        Self {
            boundary: boundary.max(1),
        }
    }

    pub fn boundary(&self) -> usize {
        self.boundary
    }

    /// Exact-day buckets plus the overflow bucket
    pub fn len(&self) -> usize {
        self.boundary + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Bucket index for a whole number of elapsed days
    ///
    /// `days <= 1` lands in the first bucket, `days > boundary` in the last.
    pub fn index_for(&self, days: i64) -> usize {
        if days <= 1 {
            0
        } else if days as u64 > self.boundary as u64 {
            self.boundary
        } else {
            (days - 1) as usize
        }
    }

    /// Column labels: `1-Days` .. `N-Days`, `>N-Days`
    pub fn labels(&self) -> Vec<String> {
        (1..=self.boundary)
            .map(|day| format!("{}-Days", day))
            .chain(std::iter::once(format!(">{}-Days", self.boundary)))
            .collect()
    }
}

/// Flat bucket counts for every step pair
///
/// Row `pair` occupies `cells[pair * buckets .. (pair + 1) * buckets]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairHistogram {
    buckets: DayBuckets,
    pairs: usize,
    cells: Vec<u64>,
}

impl PairHistogram {
    pub fn new(pairs: usize, buckets: DayBuckets) -> Self {
        Self {
            buckets,
            pairs,
            cells: vec![0; pairs * buckets.len()],
        }
    }

    pub fn buckets(&self) -> DayBuckets {
        self.buckets
    }

    pub fn pairs(&self) -> usize {
        self.pairs
    }

    /// Count one transition of `days` for `pair`
    pub fn record(&mut self, pair: usize, days: i64) {
        let width = self.buckets.len();
        let bucket = self.buckets.index_for(days);
        self.cells[pair * width + bucket] += 1;
    }

    /// Element-wise add `other` into `self`
    pub fn merge(&mut self, other: &PairHistogram) {
        debug_assert_eq!(self.pairs, other.pairs);
        debug_assert_eq!(self.buckets, other.buckets);
        for (cell, add) in self.cells.iter_mut().zip(&other.cells) {
            *cell += add;
        }
    }

    pub fn row(&self, pair: usize) -> &[u64] {
        let width = self.buckets.len();
        &self.cells[pair * width..(pair + 1) * width]
    }

    pub fn total(&self) -> u64 {
        self.cells.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        let buckets = DayBuckets::new(7);
        assert_eq!(buckets.len(), 8);
        assert_eq!(buckets.index_for(-3), 0);
        assert_eq!(buckets.index_for(0), 0);
        assert_eq!(buckets.index_for(1), 0);
        assert_eq!(buckets.index_for(2), 1);
        assert_eq!(buckets.index_for(7), 6);
        assert_eq!(buckets.index_for(8), 7);
        assert_eq!(buckets.index_for(i64::MAX), 7);
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            DayBuckets::new(3).labels(),
            vec!["1-Days", "2-Days", "3-Days", ">3-Days"]
        );
        assert_eq!(DayBuckets::new(7).labels().last().unwrap(), ">7-Days");
    }

    #[test]
    fn test_record_and_merge() {
        let buckets = DayBuckets::new(7);
        let mut left = PairHistogram::new(3, buckets);
        let mut right = PairHistogram::new(3, buckets);

        left.record(1, 3);
        right.record(1, 3);
        right.record(2, 30);

        left.merge(&right);
        assert_eq!(left.row(1), &[0, 0, 2, 0, 0, 0, 0, 0]);
        assert_eq!(left.row(2), &[0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(left.total(), 3);
    }
}
