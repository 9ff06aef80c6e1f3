//! Canonical step order.
//!
//! The order decides which step pairs are reported (the earlier step must be
//! at or before the later one) and the row order of the report.

use crate::utils::error::ConfigError;
use std::collections::HashMap;

/// Ordered, duplicate-free sequence of canonical step names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOrder {
    steps: Vec<String>,
    positions: HashMap<String, usize>,
}

impl StepOrder {
    /// Build a step order, rejecting empty, blank or repeated names
    pub fn new<I, S>(steps: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let steps: Vec<String> = steps.into_iter().map(Into::into).collect();
        if steps.is_empty() {
            return Err(ConfigError::Invalid("step order is empty".to_string()));
        }

        let mut positions = HashMap::with_capacity(steps.len());
        for (index, name) in steps.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "step order entry {} is blank",
                    index + 1
                )));
            }
            if positions.insert(name.clone(), index).is_some() {
                return Err(ConfigError::Invalid(format!(
                    "step '{}' appears more than once in the step order",
                    name
                )));
            }
        }

        Ok(Self { steps, positions })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.steps
    }

    pub fn name(&self, position: usize) -> Option<&str> {
        self.steps.get(position).map(String::as_str)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// True when `from` is at or before `to`; false if either is unknown
    pub fn precedes_or_equals(&self, from: &str, to: &str) -> bool {
        match (self.position(from), self.position(to)) {
            (Some(f), Some(t)) => f <= t,
            _ => false,
        }
    }

    /// Number of (from, to) pairs with from at or before to
    pub fn pair_count(&self) -> usize {
        let n = self.steps.len();
        n * (n + 1) / 2
    }

    /// Dense index of the pair (from, to) in `0..pair_count()`.
    ///
    /// Pairs are numbered from-outer, to-inner, which is also report row order.
    pub fn pair_index(&self, from: usize, to: usize) -> usize {
        debug_assert!(from <= to && to < self.steps.len());
        let n = self.steps.len();
        from * n - from * from.saturating_sub(1) / 2 + (to - from)
    }

    /// Every (from, to) position pair in report row order
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.steps.len();
        (0..n).flat_map(move |from| (from..n).map(move |to| (from, to)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(StepOrder::new(Vec::<String>::new()).is_err());
        assert!(StepOrder::new(["A", "B", "A"]).is_err());
        assert!(StepOrder::new(["A", " "]).is_err());
    }

    #[test]
    fn test_precedes_or_equals() {
        let order = StepOrder::new(["A", "B", "C"]).unwrap();
        assert!(order.precedes_or_equals("A", "C"));
        assert!(order.precedes_or_equals("B", "B"));
        assert!(!order.precedes_or_equals("C", "A"));
        assert!(!order.precedes_or_equals("A", "Z"));
    }

    #[test]
    fn test_pair_index_matches_row_order() {
        let order = StepOrder::new(["A", "B", "C", "D"]).unwrap();
        let pairs: Vec<_> = order.pairs().collect();
        assert_eq!(pairs.len(), order.pair_count());
        for (expected, (from, to)) in pairs.into_iter().enumerate() {
            assert_eq!(order.pair_index(from, to), expected);
        }
    }
}
