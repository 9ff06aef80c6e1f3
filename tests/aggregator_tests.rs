use chrono::{Duration, NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use step_transit::aggregator::{
    merge_batches, AggregateOptions, DayBuckets, ElapsedPolicy, Master, ResultSet,
};
use step_transit::ingest::PartialBatch;
use step_transit::model::{DuplicatePolicy, StepOrder, StepRecord, UnitRecord};
use std::collections::HashMap;
use std::path::PathBuf;

fn day(n: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
        + Duration::days(n)
}

fn order() -> StepOrder {
    StepOrder::new(["A", "B", "C", "D"]).unwrap()
}

/// Deterministic spread of units with gaps, repeated steps and odd offsets
fn sample_units(count: usize) -> Vec<UnitRecord> {
    let names = ["A", "B", "C", "D"];
    (0..count)
        .map(|i| {
            let serial = format!("SN{:05}", i);
            let mut unit = UnitRecord::new(&serial, StepRecord::new("A", day(0)));
            for (k, name) in names.iter().enumerate().skip(1) {
                // Drop some steps so units differ in coverage.
                if (i + k) % 5 == 0 {
                    continue;
                }
                let offset = ((i * 7 + k * 3) % 13) as i64 - 2;
                unit.set_step(StepRecord::new(*name, day(offset)), DuplicatePolicy::Overwrite);
            }
            unit
        })
        .collect()
}

fn run(units: &[UnitRecord], workers: usize) -> ResultSet {
    Master::new(AggregateOptions {
        workers,
        bucket_boundary: 7,
        elapsed_policy: ElapsedPolicy::FoldIntoFirst,
    })
    .run(units, &order())
    .unwrap()
    .result
}

#[test]
fn test_bucket_sum_equals_units_with_both_steps() {
    let units = sample_units(500);
    let result = run(&units, 8);
    let order = order();

    for (from, to) in order.pairs() {
        let from = order.name(from).unwrap();
        let to = order.name(to).unwrap();
        let expected = units
            .iter()
            .filter(|u| u.step(from).is_some() && u.step(to).is_some())
            .count() as u64;
        assert_eq!(result.pair_total(from, to), expected, "pair {} -> {}", from, to);
    }
}

#[test]
fn test_each_unit_lands_in_exactly_one_bucket() {
    let buckets = DayBuckets::new(7);
    let units = sample_units(40);
    let order = order();

    for unit in &units {
        let single = run(std::slice::from_ref(unit), 3);
        for (from, to) in order.pairs() {
            let from = order.name(from).unwrap();
            let to = order.name(to).unwrap();
            let counts = single.counts(from, to).unwrap();
            match (unit.step(from), unit.step(to)) {
                (Some(a), Some(b)) => {
                    let days = (b.completed_at() - a.completed_at()).num_days();
                    let mut expected = vec![0u64; 8];
                    expected[buckets.index_for(days)] = 1;
                    assert_eq!(counts, expected.as_slice());
                }
                _ => assert_eq!(counts.iter().sum::<u64>(), 0),
            }
        }
    }
}

#[test]
fn test_result_independent_of_worker_count_and_shard_order() {
    let units = sample_units(333);
    let baseline = run(&units, 1);

    for workers in [2, 5, 24, 500] {
        assert_eq!(run(&units, workers), baseline, "workers = {}", workers);
    }

    let mut reversed = units.clone();
    reversed.reverse();
    assert_eq!(run(&reversed, 7), baseline);

    let mut rotated = units;
    rotated.rotate_left(101);
    assert_eq!(run(&rotated, 4), baseline);
}

#[test]
fn test_boundary_law() {
    let order = StepOrder::new(["A", "B"]).unwrap();
    let cases = [(0, 0), (1, 0), (2, 1), (7, 6), (8, 7), (40, 7)];

    for (elapsed, bucket) in cases {
        let mut unit = UnitRecord::new("SN1", StepRecord::new("A", day(0)));
        unit.set_step(StepRecord::new("B", day(elapsed)), DuplicatePolicy::Overwrite);
        let result = Master::default().run(&[unit], &order).unwrap().result;

        let mut expected = vec![0u64; 8];
        expected[bucket] = 1;
        assert_eq!(result.counts("A", "B").unwrap(), expected.as_slice(), "elapsed {}", elapsed);
    }
}

#[test]
fn test_merge_independent_of_batch_order() {
    fn batch(step: &str, rows: &[(&str, i64)]) -> PartialBatch {
        let units: HashMap<String, UnitRecord> = rows
            .iter()
            .map(|(sn, d)| (sn.to_string(), UnitRecord::new(*sn, StepRecord::new(step, day(*d)))))
            .collect();
        PartialBatch {
            step_name: step.to_string(),
            source: PathBuf::from(step),
            rows: units.len(),
            units,
            conflicts: 0,
        }
    }

    let batches = vec![
        batch("A", &[("SN1", 0), ("SN2", 0), ("SN3", 1)]),
        batch("B", &[("SN1", 2), ("SN3", 9)]),
        batch("C", &[("SN2", 4), ("SN4", 5)]),
    ];

    let sorted = |mut units: Vec<UnitRecord>| {
        units.sort_by(|a, b| a.serial_number().cmp(b.serial_number()));
        units
    };

    let (forward, _) = merge_batches(batches.clone(), DuplicatePolicy::Overwrite);
    let mut reversed_batches = batches;
    reversed_batches.reverse();
    let (backward, stats) = merge_batches(reversed_batches, DuplicatePolicy::Overwrite);

    assert_eq!(sorted(forward), sorted(backward));
    assert_eq!(stats.units, 4);
    assert_eq!(stats.conflicts, 0);
}

#[test]
fn test_custom_boundary_widens_rows() {
    let order = StepOrder::new(["A", "B"]).unwrap();
    let mut unit = UnitRecord::new("SN1", StepRecord::new("A", day(0)));
    unit.set_step(StepRecord::new("B", day(9)), DuplicatePolicy::Overwrite);

    let result = Master::new(AggregateOptions {
        workers: 2,
        bucket_boundary: 10,
        elapsed_policy: ElapsedPolicy::FoldIntoFirst,
    })
    .run(&[unit], &order)
    .unwrap()
    .result;

    let counts = result.counts("A", "B").unwrap();
    assert_eq!(counts.len(), 11);
    assert_eq!(counts[8], 1);
}
