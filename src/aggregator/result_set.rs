//! The complete cross-step transition-time histogram of a run.

use super::histogram::{DayBuckets, PairHistogram};
use crate::model::StepOrder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// fromStep -> toStep -> bucket counts
///
/// Holds an entry for every pair with fromStep at or before toStep in the
/// canonical order (zero rows included) and for no other pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Canonical step order the rows follow
    pub step_order: Vec<String>,

    /// Number of exact-day buckets before the overflow bucket
    pub bucket_boundary: usize,

    pub steps_time_number: BTreeMap<String, BTreeMap<String, Vec<u64>>>,
}

impl ResultSet {
    /// Build from a reduced histogram indexed by `order.pair_index`
    pub fn from_histogram(order: &StepOrder, histogram: &PairHistogram) -> Self {
        let mut steps_time_number: BTreeMap<String, BTreeMap<String, Vec<u64>>> = BTreeMap::new();
        for (from, to) in order.pairs() {
            let row = histogram.row(order.pair_index(from, to)).to_vec();
            steps_time_number
                .entry(order.names()[from].clone())
                .or_default()
                .insert(order.names()[to].clone(), row);
        }

        Self {
            step_order: order.names().to_vec(),
            bucket_boundary: histogram.buckets().boundary(),
            steps_time_number,
        }
    }

    pub fn buckets(&self) -> DayBuckets {
        DayBuckets::new(self.bucket_boundary)
    }

    /// Bucket counts for a pair, `None` for pairs that are not reported
    pub fn counts(&self, from: &str, to: &str) -> Option<&[u64]> {
        self.steps_time_number
            .get(from)
            .and_then(|row| row.get(to))
            .map(Vec::as_slice)
    }

    /// Units that had both steps of the pair recorded
    pub fn pair_total(&self, from: &str, to: &str) -> u64 {
        self.counts(from, to).map(|c| c.iter().sum()).unwrap_or(0)
    }

    /// Rows in report order: from-step outer, to-step inner
    pub fn rows(&self) -> impl Iterator<Item = (&str, &str, &[u64])> + '_ {
        let steps = &self.step_order;
        (0..steps.len()).flat_map(move |i| {
            (i..steps.len()).filter_map(move |j| {
                let from = steps[i].as_str();
                let to = steps[j].as_str();
                self.counts(from, to).map(|counts| (from, to, counts))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_forward_pairs_present() {
        let order = StepOrder::new(["A", "B", "C"]).unwrap();
        let mut histogram = PairHistogram::new(order.pair_count(), DayBuckets::new(7));
        histogram.record(order.pair_index(0, 2), 10);

        let result = ResultSet::from_histogram(&order, &histogram);

        assert_eq!(result.counts("A", "C"), Some(&[0, 0, 0, 0, 0, 0, 0, 1][..]));
        assert_eq!(result.counts("B", "B"), Some(&[0u64; 8][..]));
        assert!(result.counts("C", "A").is_none());
        assert_eq!(result.pair_total("A", "C"), 1);

        let rows: Vec<_> = result.rows().map(|(f, t, _)| (f, t)).collect();
        assert_eq!(
            rows,
            vec![("A", "A"), ("A", "B"), ("A", "C"), ("B", "B"), ("B", "C"), ("C", "C")]
        );
    }
}
