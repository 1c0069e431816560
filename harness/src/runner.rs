//! Warm-up/timed benchmark runs over a single dataset
//!
//! A run generates its workload once, then for every strategy in
//! [`LookupStrategy::ALL`] order executes the untimed warm-ups followed by the
//! timed repetitions, and reduces the timings to mean/min/max.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{HarnessError, Result};
use crate::query::{generate_with_policy, QueryPolicy, DEFAULT_QUERY_COUNT};
use crate::record::Record;
use crate::strategies::LookupStrategy;
use crate::timer::{time_once, Timer};

pub const DEFAULT_WARMUP_RUNS: u32 = 5;
pub const DEFAULT_TIMED_RUNS: u32 = 10;

/// Repetition and workload settings for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Untimed invocations per strategy before measuring
    pub warmup_runs: u32,
    /// Measured invocations per strategy, at least one
    pub timed_runs: u32,
    /// Queries in the generated workload
    pub query_count: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            warmup_runs: DEFAULT_WARMUP_RUNS,
            timed_runs: DEFAULT_TIMED_RUNS,
            query_count: DEFAULT_QUERY_COUNT,
        }
    }
}

impl RunOptions {
    pub fn validate(&self) -> Result<()> {
        if self.timed_runs < 1 {
            return Err(HarnessError::invalid_input(
                "timed_runs must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Aggregated timings of one strategy within one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmResult {
    pub name: String,
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    /// Matches found by a single invocation
    pub matches: u64,
}

/// Outcome of a single-dataset run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkResult {
    pub dataset_label: String,
    pub dataset_length: usize,
    pub query_count: usize,
    pub warmup_runs: u32,
    pub timed_runs: u32,
    pub algorithms: Vec<AlgorithmResult>,
    /// Sum of match counts over every warm-up and timed invocation
    pub verification_sum: u64,
    pub started_at: DateTime<Utc>,
}

/// Mean, minimum and maximum of a set of timing samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Reduce timed durations to their summary statistics
pub fn aggregate(samples: &[f64]) -> Result<Aggregate> {
    if samples.is_empty() {
        return Err(HarnessError::invalid_input(
            "cannot aggregate an empty set of timings",
        ));
    }

    let sum: f64 = samples.iter().sum();
    let min_ms = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max_ms = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Ok(Aggregate {
        avg_ms: sum / samples.len() as f64,
        min_ms,
        max_ms,
    })
}

/// Benchmark all strategies against `dataset` with the mixed workload
pub fn run(dataset: &[Record], label: &str, options: &RunOptions) -> Result<BenchmarkResult> {
    run_with_policy(dataset, label, options, QueryPolicy::Mixed)
}

/// Benchmark all strategies against `dataset` with the given workload policy
pub fn run_with_policy(
    dataset: &[Record],
    label: &str,
    options: &RunOptions,
    policy: QueryPolicy,
) -> Result<BenchmarkResult> {
    if dataset.is_empty() {
        return Err(HarnessError::invalid_input(format!(
            "dataset '{}' is empty",
            label
        )));
    }
    options.validate()?;

    let started_at = Utc::now();
    let timer = Timer::start();
    let workload = generate_with_policy(dataset, options.query_count, policy)?;

    info!(
        label,
        records = dataset.len(),
        queries = workload.len(),
        warmup_runs = options.warmup_runs,
        timed_runs = options.timed_runs,
        "starting benchmark run"
    );

    let mut check = MatchCheck::default();
    let mut algorithms = Vec::with_capacity(LookupStrategy::ALL.len());

    for strategy in LookupStrategy::ALL {
        for _ in 0..options.warmup_runs {
            let matches = strategy.search(dataset, &workload);
            check.observe(strategy, matches);
        }

        let mut samples = Vec::with_capacity(options.timed_runs as usize);
        let mut matches = 0;
        for _ in 0..options.timed_runs {
            let timing = time_once(strategy, dataset, &workload);
            check.observe(strategy, timing.matches);
            samples.push(timing.elapsed_ms);
            matches = timing.matches;
        }

        let stats = aggregate(&samples)?;
        debug!(
            strategy = strategy.name(),
            avg_ms = stats.avg_ms,
            min_ms = stats.min_ms,
            max_ms = stats.max_ms,
            matches,
            "strategy finished"
        );

        algorithms.push(AlgorithmResult {
            name: strategy.name().to_string(),
            avg_ms: stats.avg_ms,
            min_ms: stats.min_ms,
            max_ms: stats.max_ms,
            matches,
        });
    }

    info!(
        label,
        elapsed_ms = timer.elapsed_ms(),
        "benchmark run complete"
    );

    Ok(BenchmarkResult {
        dataset_label: label.to_string(),
        dataset_length: dataset.len(),
        query_count: workload.len(),
        warmup_runs: options.warmup_runs,
        timed_runs: options.timed_runs,
        algorithms,
        verification_sum: check.sum,
        started_at,
    })
}

/// Tracks match counts across invocations; every invocation should agree
#[derive(Debug, Default)]
struct MatchCheck {
    expected: Option<u64>,
    sum: u64,
}

impl MatchCheck {
    fn observe(&mut self, strategy: LookupStrategy, matches: u64) {
        self.sum += matches;
        match self.expected {
            None => self.expected = Some(matches),
            Some(expected) if expected != matches => {
                warn!(
                    strategy = strategy.name(),
                    expected,
                    actual = matches,
                    "match count differs between invocations; dataset ids may not be unique"
                );
            }
            Some(_) => {}
        }
    }
}
