use anyhow::Result;
use clap::Args;
use lookup_harness::{HarnessConfig, RunRequest, RunResponse};

use super::{run_on_worker, unexpected, RepetitionArgs};
use crate::output::OutputManager;

#[derive(Args, Debug)]
pub struct StressArgs {
    #[command(flatten)]
    pub repetitions: RepetitionArgs,
}

/// Scale-up, worst-case and memory-limited scenarios, 10000 queries each
pub async fn run(args: StressArgs, mut config: HarnessConfig, output: OutputManager) -> Result<()> {
    args.repetitions.apply(&mut config);

    let response = run_on_worker(
        &config,
        RunRequest::StressTest,
        &output,
        "Running stress scenarios...",
    )
    .await?;

    match response {
        RunResponse::StressResults(report) => output.print_stress_report(&report),
        other => Err(unexpected(&other)),
    }
}
