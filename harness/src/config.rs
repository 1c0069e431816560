//! Configuration management for the lookup benchmark harness
//!
//! Settings are resolved in layers: built-in defaults, then an optional TOML
//! file, then `LOOKUP_BENCH_*` environment variables. Command line flags are
//! applied last by the binary.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::query::DEFAULT_QUERY_COUNT;
use crate::runner::{RunOptions, DEFAULT_TIMED_RUNS, DEFAULT_WARMUP_RUNS};

pub const ENV_WARMUP_RUNS: &str = "LOOKUP_BENCH_WARMUP_RUNS";
pub const ENV_TIMED_RUNS: &str = "LOOKUP_BENCH_TIMED_RUNS";
pub const ENV_QUERY_COUNT: &str = "LOOKUP_BENCH_QUERY_COUNT";
pub const ENV_LOG_LEVEL: &str = "LOOKUP_BENCH_LOG_LEVEL";

/// Main configuration structure for the harness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HarnessConfig {
    /// Repetition and workload defaults
    pub benchmark: BenchmarkSettings,

    /// Background worker settings
    pub worker: WorkerSettings,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Metrics configuration
    pub metrics: MetricsSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkSettings {
    /// Untimed invocations per strategy
    pub warmup_runs: u32,

    /// Measured invocations per strategy
    pub timed_runs: u32,

    /// Queries per generated workload
    pub query_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerSettings {
    /// Capacity of the request and response channels
    pub queue_capacity: usize,

    /// Name given to the background thread
    pub thread_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set
    pub level: String,

    /// Emit JSON formatted log lines
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    /// Record run metrics in the Prometheus registry
    pub enabled: bool,
}

impl Default for BenchmarkSettings {
    fn default() -> Self {
        Self {
            warmup_runs: DEFAULT_WARMUP_RUNS,
            timed_runs: DEFAULT_TIMED_RUNS,
            query_count: DEFAULT_QUERY_COUNT,
        }
    }
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            queue_capacity: 4,
            thread_name: "lookup-bench-worker".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl HarnessConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.to_string_lossy().to_string(),
        })?;

        let config: HarnessConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError { reason: e.to_string() })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with fallback order: defaults -> file -> env
    ///
    /// An explicitly named file must exist; only `None` falls back to the defaults.
    pub fn load_with_fallback<P: AsRef<Path>>(config_path: Option<P>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) => HarnessConfig::from_file(path)?,
            None => HarnessConfig::default(),
        };

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Override settings from the process environment
    pub fn apply_env(&mut self) -> ConfigResult<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Override settings from an arbitrary variable lookup
    pub fn apply_env_from<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_WARMUP_RUNS) {
            self.benchmark.warmup_runs = parse_env(ENV_WARMUP_RUNS, value)?;
        }

        if let Some(value) = lookup(ENV_TIMED_RUNS) {
            self.benchmark.timed_runs = parse_env(ENV_TIMED_RUNS, value)?;
        }

        if let Some(value) = lookup(ENV_QUERY_COUNT) {
            self.benchmark.query_count = parse_env(ENV_QUERY_COUNT, value)?;
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.benchmark.timed_runs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "benchmark.timed_runs".to_string(),
                value: "0".to_string(),
            });
        }

        if self.worker.queue_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "worker.queue_capacity".to_string(),
                value: "0".to_string(),
            });
        }

        if self.worker.thread_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "worker.thread_name".to_string(),
                value: self.worker.thread_name.clone(),
            });
        }

        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                value: self.logging.level.clone(),
            });
        }

        Ok(())
    }

    /// Run options derived from the `[benchmark]` section
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            warmup_runs: self.benchmark.warmup_runs,
            timed_runs: self.benchmark.timed_runs,
            query_count: self.benchmark.query_count,
        }
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::SerializeError {
                    reason: format!("Unable to create {}: {}", parent.display(), e),
                })?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError { reason: e.to_string() })?;

        fs::write(path, content).map_err(|e| ConfigError::SerializeError {
            reason: format!("Unable to write {}: {}", path.display(), e),
        })?;

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(field: &str, value: String) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        value,
    })
}
