//! Plain-text run summary for stdout.

use crate::aggregator::ResultSet;

/// Summarise adjacent-step transitions
///
/// One line per consecutive pair in canonical order with the unit count and
/// the share of units that made the move within the first bucket.
pub fn generate_text_summary(result: &ResultSet, units: usize) -> String {
    let mut out = String::new();
    let labels = result.buckets().labels();

    out.push_str(&format!("Units: {}\n", units));
    out.push_str(&format!("Steps: {}\n\n", result.step_order.len()));
    out.push_str(&format!("{:<32} {:>8} {:>10}\n", "Transition", "Units", labels[0]));

    for pair in result.step_order.windows(2) {
        let (from, to) = (pair[0].as_str(), pair[1].as_str());
        let total = result.pair_total(from, to);
        let first = result.counts(from, to).map(|c| c[0]).unwrap_or(0);
        let share = if total > 0 {
            first as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        out.push_str(&format!(
            "{:<32} {:>8} {:>9.1}%\n",
            format!("{} -> {}", from, to),
            total,
            share
        ));
    }

    out
}
