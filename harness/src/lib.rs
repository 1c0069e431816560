//! Lookup benchmark harness
//!
//! Measures the cost of three record lookup strategies (hash map, linear search
//! with early exit, brute-force full scan) against a shared synthetic query
//! workload, using untimed warm-ups followed by timed repetitions:
//!
//! - Query generation with deterministic hit/miss policies
//! - Stateless lookup strategies and a monotonic run timer
//! - Single-dataset benchmark runs and the three-scenario stress suite
//! - A background worker that keeps runs off the caller's thread

pub mod config;
pub mod error;
pub mod metrics;
pub mod query;
pub mod record;
pub mod runner;
pub mod scenario;
pub mod strategies;
pub mod timer;
pub mod worker;

// Re-export commonly used types
pub use config::HarnessConfig;
pub use error::{ConfigError, HarnessError, Result};
pub use metrics::HarnessMetrics;
pub use query::{generate, QueryPolicy, Workload};
pub use record::Record;
pub use runner::{aggregate, run, AlgorithmResult, BenchmarkResult, RunOptions};
pub use scenario::{run_size_sweep, run_stress_suite, ScenarioResult, StressReport};
pub use strategies::{brute_force_search, hashing_search, linear_search, LookupStrategy};
pub use timer::{time_once, Timing};
pub use worker::{BenchmarkWorker, ErrorReport, RunGate, RunRequest, RunResponse, WorkerHandle};
