//! Integration tests for the lookup benchmark harness

use std::collections::HashSet;

use lookup_harness::{
    generate, record::sequential_dataset, run, run_stress_suite, HarnessError, Record,
    RunOptions,
};

fn assert_consistent(result: &lookup_harness::BenchmarkResult) {
    assert_eq!(result.algorithms.len(), 3);
    let expected = result.algorithms[0].matches;
    for algorithm in &result.algorithms {
        assert_eq!(algorithm.matches, expected, "{}", algorithm.name);
        assert!(algorithm.min_ms >= 0.0, "{}", algorithm.name);
        assert!(algorithm.min_ms <= algorithm.avg_ms, "{}", algorithm.name);
        assert!(algorithm.avg_ms <= algorithm.max_ms, "{}", algorithm.name);
    }
}

#[test]
fn test_small_dataset_end_to_end() {
    let dataset = sequential_dataset(10);
    let options = RunOptions {
        warmup_runs: 1,
        timed_runs: 1,
        query_count: 10,
    };

    let result = run(&dataset, "Small", &options).unwrap();

    assert_eq!(result.dataset_label, "Small");
    assert_eq!(result.dataset_length, 10);
    assert_eq!(result.query_count, 10);
    assert_eq!(result.warmup_runs, 1);
    assert_eq!(result.timed_runs, 1);
    assert_consistent(&result);

    // A single timed run makes every statistic the same sample.
    for algorithm in &result.algorithms {
        assert_eq!(algorithm.min_ms, algorithm.avg_ms);
        assert_eq!(algorithm.avg_ms, algorithm.max_ms);
        assert_eq!(algorithm.matches, 5);
    }
}

#[test]
fn test_empty_dataset_rejected() {
    let error = run(&[], "Empty", &RunOptions::default()).unwrap_err();
    assert!(matches!(error, HarnessError::InvalidInput(_)));
}

#[test]
fn test_workload_size_invariant() {
    let dataset = sequential_dataset(37);
    for count in [0, 1, 2, 36, 37, 73, 74, 75, 1000] {
        for all_misses in [false, true] {
            let workload = generate(&dataset, count, all_misses).unwrap();
            assert_eq!(workload.len(), count, "count={} all_misses={}", count, all_misses);
        }
    }
}

#[test]
fn test_hit_count_correctness() {
    let dataset = sequential_dataset(1000);
    let ids: HashSet<i64> = dataset.iter().map(|r| r.id).collect();
    let workload = generate(&dataset, 2000, false).unwrap();

    let hits = workload.iter().filter(|q| ids.contains(q)).count();
    assert_eq!(hits, 1000);

    let misses: HashSet<i64> = workload.iter().copied().filter(|q| !ids.contains(q)).collect();
    let expected: HashSet<i64> = (1001..=2000).collect();
    assert_eq!(misses, expected);
}

#[test]
fn test_all_misses_on_irregular_ids() {
    let dataset: Vec<Record> = [17, -4, 900, 3, 88].into_iter().map(Record::new).collect();
    let ids: HashSet<i64> = dataset.iter().map(|r| r.id).collect();

    let workload = generate(&dataset, 100, true).unwrap();
    assert!(workload.iter().all(|q| !ids.contains(q)));
}

#[test]
fn test_unsorted_dataset_runs() {
    let dataset: Vec<Record> = (1..=60).rev().map(|id| Record::new(id * 3)).collect();
    let options = RunOptions {
        warmup_runs: 2,
        timed_runs: 3,
        query_count: 90,
    };

    let result = run(&dataset, "Reversed", &options).unwrap();
    assert_consistent(&result);
    assert_eq!(result.algorithms[0].matches, 45);
    // 3 strategies x 5 invocations x 45 matches
    assert_eq!(result.verification_sum, 675);
}

#[test]
fn test_stress_suite_order_and_consistency() {
    let options = RunOptions {
        warmup_runs: 0,
        timed_runs: 1,
        ..RunOptions::default()
    };

    let report = run_stress_suite(&options).unwrap();

    let names: Vec<&str> = report.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Input grows 10×", "Worst-case input", "Memory-limited"]);

    let expected_matches = [5000, 0, 100];
    for (scenario, expected) in report.iter().zip(expected_matches) {
        assert_eq!(scenario.algorithms.len(), 3);
        for algorithm in &scenario.algorithms {
            assert_eq!(algorithm.matches, expected, "{} / {}", scenario.name, algorithm.name);
        }
    }
}

#[test]
fn test_stress_suite_rejects_zero_timed_runs() {
    let options = RunOptions {
        timed_runs: 0,
        ..RunOptions::default()
    };
    assert!(matches!(
        run_stress_suite(&options),
        Err(HarnessError::InvalidInput(_))
    ));
}
