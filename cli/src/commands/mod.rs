pub mod config;
pub mod run;
pub mod stress;
pub mod sweep;

pub use config::ConfigArgs;
pub use run::RunArgs;
pub use stress::StressArgs;
pub use sweep::SweepArgs;

use anyhow::Result;
use clap::Args;
use lookup_harness::{BenchmarkWorker, HarnessConfig, RunGate, RunRequest, RunResponse};
use tracing::{debug, trace};

use crate::error::CliError;
use crate::output::OutputManager;

/// Repetition overrides shared by the run commands
#[derive(Args, Debug, Clone, Default)]
pub struct RepetitionArgs {
    /// Untimed warm-up invocations per strategy
    #[arg(long)]
    pub warmup: Option<u32>,

    /// Timed invocations per strategy
    #[arg(long)]
    pub timed: Option<u32>,
}

impl RepetitionArgs {
    pub fn apply(&self, config: &mut HarnessConfig) {
        if let Some(warmup) = self.warmup {
            config.benchmark.warmup_runs = warmup;
        }
        if let Some(timed) = self.timed {
            config.benchmark.timed_runs = timed;
        }
    }
}

/// Send one request to a fresh worker and wait for its response.
///
/// The spinner keeps animating on this thread while the worker thread is busy
/// with the run.
pub async fn run_on_worker(
    config: &HarnessConfig,
    request: RunRequest,
    output: &OutputManager,
    message: &str,
) -> Result<RunResponse> {
    let handle = BenchmarkWorker::spawn(config)?;
    let mut gate = RunGate::new(handle);

    debug!(kind = request.kind(), "submitting run");
    gate.start(request).await?;

    let spinner = output.create_spinner(message);
    let response = gate.next_result().await;
    spinner.finish_and_clear();

    let handle = gate.into_inner();
    if let Some(metrics) = handle.metrics() {
        trace!("worker metrics:\n{}", metrics.export_prometheus()?);
    }
    handle.shutdown()?;

    match response? {
        RunResponse::Error(report) => Err(CliError::from(report).into()),
        other => Ok(other),
    }
}

fn unexpected(response: &RunResponse) -> anyhow::Error {
    let kind = match response {
        RunResponse::Results(_) => "results",
        RunResponse::StressResults(_) => "stressResults",
        RunResponse::SweepResults(_) => "sweepResults",
        RunResponse::Error(_) => "error",
    };
    CliError::UnexpectedResponse(kind.to_string()).into()
}
