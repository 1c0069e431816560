//! Stress scenarios and size sweeps
//!
//! The stress suite is a fixed battery of three runs, each exercising a
//! different complexity regime. The size sweep benchmarks growing prefixes of
//! one dataset.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{HarnessError, Result};
use crate::query::{QueryPolicy, DEFAULT_QUERY_COUNT};
use crate::record::{sequential_dataset, Record};
use crate::runner::{run_with_policy, AlgorithmResult, BenchmarkResult, RunOptions};

/// Outcome of one stress scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub name: String,
    pub algorithms: Vec<AlgorithmResult>,
}

/// The three scenario results, in suite order
pub type StressReport = Vec<ScenarioResult>;

/// A fixed dataset/workload configuration in the stress suite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    pub name: &'static str,
    pub dataset_size: usize,
    pub policy: QueryPolicy,
}

/// Suite definition, executed and reported in this order
pub const STRESS_SCENARIOS: [Scenario; 3] = [
    Scenario {
        name: "Input grows 10×",
        dataset_size: 10_000,
        policy: QueryPolicy::Mixed,
    },
    Scenario {
        name: "Worst-case input",
        dataset_size: 10_000,
        policy: QueryPolicy::AllMisses,
    },
    Scenario {
        name: "Memory-limited",
        dataset_size: 100,
        policy: QueryPolicy::Mixed,
    },
];

/// Prefix sizes used by the size sweep when none are given
pub const DEFAULT_SWEEP_SIZES: [(&str, usize); 3] =
    [("Small", 10), ("Medium", 100), ("Large", 1000)];

/// Run the stress suite.
///
/// Repetition counts come from `options`; the query count is fixed at 10000 for
/// every scenario.
pub fn run_stress_suite(options: &RunOptions) -> Result<StressReport> {
    let options = RunOptions {
        query_count: DEFAULT_QUERY_COUNT,
        ..*options
    };
    options.validate()?;

    let mut report = Vec::with_capacity(STRESS_SCENARIOS.len());
    for scenario in &STRESS_SCENARIOS {
        report.push(run_scenario(scenario, &options)?);
    }

    info!(scenarios = report.len(), "stress suite complete");
    Ok(report)
}

/// Run a single scenario on a freshly built dataset
pub fn run_scenario(scenario: &Scenario, options: &RunOptions) -> Result<ScenarioResult> {
    let dataset = sequential_dataset(scenario.dataset_size);
    let result = run_with_policy(&dataset, scenario.name, options, scenario.policy)?;

    Ok(ScenarioResult {
        name: scenario.name.to_string(),
        algorithms: result.algorithms,
    })
}

/// Benchmark labelled prefixes of `dataset`.
///
/// Prefixes longer than the dataset are clamped to its full length. Results are
/// returned in the order of `sizes`.
pub fn run_size_sweep(
    dataset: &[Record],
    sizes: &[(String, usize)],
    options: &RunOptions,
) -> Result<Vec<BenchmarkResult>> {
    if dataset.is_empty() {
        return Err(HarnessError::invalid_input("cannot sweep an empty dataset"));
    }
    if sizes.is_empty() {
        return Err(HarnessError::invalid_input("size sweep needs at least one size"));
    }
    if let Some((label, _)) = sizes.iter().find(|(_, size)| *size == 0) {
        return Err(HarnessError::invalid_input(format!(
            "sweep size '{}' must be greater than zero",
            label
        )));
    }
    options.validate()?;

    sizes
        .iter()
        .map(|(label, size)| {
            let prefix = &dataset[..(*size).min(dataset.len())];
            run_with_policy(prefix, label, options, QueryPolicy::Mixed)
        })
        .collect()
}

/// The default Small/Medium/Large sweep sizes as owned labels
pub fn default_sweep_sizes() -> Vec<(String, usize)> {
    DEFAULT_SWEEP_SIZES
        .iter()
        .map(|(label, size)| (label.to_string(), *size))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_options() -> RunOptions {
        RunOptions {
            warmup_runs: 0,
            timed_runs: 1,
            query_count: 50,
        }
    }

    #[test]
    fn test_scenario_definitions() {
        let names: Vec<&str> = STRESS_SCENARIOS.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Input grows 10×", "Worst-case input", "Memory-limited"]);
        assert_eq!(STRESS_SCENARIOS[1].policy, QueryPolicy::AllMisses);
        assert_eq!(STRESS_SCENARIOS[2].dataset_size, 100);
    }

    #[test]
    fn test_memory_limited_scenario() {
        let result = run_scenario(&STRESS_SCENARIOS[2], &quick_options()).unwrap();
        assert_eq!(result.name, "Memory-limited");
        assert_eq!(result.algorithms.len(), 3);
        assert!(result.algorithms.iter().all(|a| a.matches == 25));
    }

    #[test]
    fn test_size_sweep_order_and_clamping() {
        let dataset = sequential_dataset(150);
        let results = run_size_sweep(&dataset, &default_sweep_sizes(), &quick_options()).unwrap();

        let labels: Vec<&str> = results.iter().map(|r| r.dataset_label.as_str()).collect();
        assert_eq!(labels, vec!["Small", "Medium", "Large"]);

        let lengths: Vec<usize> = results.iter().map(|r| r.dataset_length).collect();
        assert_eq!(lengths, vec![10, 100, 150]);
    }

    #[test]
    fn test_size_sweep_rejects_bad_input() {
        let sizes = default_sweep_sizes();
        assert!(run_size_sweep(&[], &sizes, &quick_options()).is_err());
        assert!(run_size_sweep(&sequential_dataset(5), &[], &quick_options()).is_err());

        let zero = vec![("Nothing".to_string(), 0)];
        let error = run_size_sweep(&sequential_dataset(5), &zero, &quick_options()).unwrap_err();
        assert!(matches!(error, HarnessError::InvalidInput(_)));
    }
}
