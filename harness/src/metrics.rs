//! Prometheus metrics for benchmark runs

use prometheus::{
    Encoder, GaugeVec, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};

use crate::error::Result;
use crate::runner::AlgorithmResult;

/// Run metrics owned by a worker
#[derive(Clone)]
pub struct HarnessMetrics {
    registry: Registry,
    runs_total: IntCounterVec,
    run_failures: IntCounter,
    run_duration: Histogram,
    strategy_avg_ms: GaugeVec,
}

impl HarnessMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let runs_total = IntCounterVec::new(
            Opts::new("lookup_bench_runs_total", "Completed runs by request kind"),
            &["kind"],
        )?;
        registry.register(Box::new(runs_total.clone()))?;

        let run_failures = IntCounter::new(
            "lookup_bench_run_failures_total",
            "Runs that ended with an error response",
        )?;
        registry.register(Box::new(run_failures.clone()))?;

        let run_duration = Histogram::with_opts(
            HistogramOpts::new(
                "lookup_bench_run_duration_seconds",
                "Wall-clock duration of a whole run including warm-ups",
            )
            .buckets(vec![0.001, 0.01, 0.1, 0.5, 1.0, 5.0, 30.0, 120.0]),
        )?;
        registry.register(Box::new(run_duration.clone()))?;

        let strategy_avg_ms = GaugeVec::new(
            Opts::new(
                "lookup_bench_strategy_avg_ms",
                "Mean timed duration of the most recent run per strategy",
            ),
            &["strategy"],
        )?;
        registry.register(Box::new(strategy_avg_ms.clone()))?;

        Ok(Self {
            registry,
            runs_total,
            run_failures,
            run_duration,
            strategy_avg_ms,
        })
    }

    /// Record a finished run of the given request kind
    pub fn record_run(&self, kind: &str, duration_secs: f64) {
        self.runs_total.with_label_values(&[kind]).inc();
        self.run_duration.observe(duration_secs);
    }

    pub fn record_failure(&self) {
        self.run_failures.inc();
    }

    /// Publish the latest per-strategy averages
    pub fn record_algorithms(&self, algorithms: &[AlgorithmResult]) {
        for algorithm in algorithms {
            self.strategy_avg_ms
                .with_label_values(&[algorithm.name.as_str()])
                .set(algorithm.avg_ms);
        }
    }

    pub fn runs_total(&self, kind: &str) -> u64 {
        self.runs_total.with_label_values(&[kind]).get()
    }

    pub fn failures_total(&self) -> u64 {
        self.run_failures.get()
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl std::fmt::Debug for HarnessMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarnessMetrics")
            .field("failures_total", &self.failures_total())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_export() {
        let metrics = HarnessMetrics::new().unwrap();
        metrics.record_run("benchmark", 0.25);
        metrics.record_run("benchmark", 0.5);
        metrics.record_run("stressTest", 3.0);
        metrics.record_failure();
        metrics.record_algorithms(&[AlgorithmResult {
            name: "Linear Search".to_string(),
            avg_ms: 1.25,
            min_ms: 1.0,
            max_ms: 1.5,
            matches: 10,
        }]);

        assert_eq!(metrics.runs_total("benchmark"), 2);
        assert_eq!(metrics.runs_total("stressTest"), 1);
        assert_eq!(metrics.failures_total(), 1);

        let text = metrics.export_prometheus().unwrap();
        assert!(text.contains("lookup_bench_runs_total{kind=\"benchmark\"} 2"));
        assert!(text.contains("lookup_bench_run_failures_total 1"));
        assert!(text.contains("lookup_bench_strategy_avg_ms{strategy=\"Linear Search\"} 1.25"));
        assert!(text.contains("lookup_bench_run_duration_seconds_count 3"));
    }

    #[test]
    fn test_registries_are_independent() {
        let first = HarnessMetrics::new().unwrap();
        let second = HarnessMetrics::new().unwrap();
        first.record_run("benchmark", 0.1);
        assert_eq!(second.runs_total("benchmark"), 0);
    }
}
