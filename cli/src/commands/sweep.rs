use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use lookup_harness::{HarnessConfig, RunRequest, RunResponse};

use super::{run_on_worker, unexpected, RepetitionArgs};
use crate::output::OutputManager;
use crate::utils;

#[derive(Args, Debug)]
pub struct SweepArgs {
    /// JSON file containing an array of records with integer `id` fields
    #[arg(long, short, conflicts_with = "size", required_unless_present = "size")]
    pub dataset: Option<PathBuf>,

    /// Sweep a synthetic dataset with ids 1..=SIZE instead of a file
    #[arg(long, short)]
    pub size: Option<usize>,

    /// Prefix sizes, e.g. `10,100,1000` or `Small=10,Medium=100` [default: Small=10,Medium=100,Large=1000]
    #[arg(long)]
    pub sizes: Option<String>,

    /// Number of queries in each generated workload
    #[arg(long)]
    pub queries: Option<usize>,

    #[command(flatten)]
    pub repetitions: RepetitionArgs,
}

pub async fn run(args: SweepArgs, mut config: HarnessConfig, output: OutputManager) -> Result<()> {
    args.repetitions.apply(&mut config);
    if let Some(queries) = args.queries {
        config.benchmark.query_count = queries;
    }

    let sizes = match args.sizes.as_deref() {
        Some(list) => utils::parse_sizes(list)?,
        None => Vec::new(),
    };
    let dataset = utils::resolve_dataset(args.dataset.as_deref(), args.size)?;

    let message = format!("Sweeping dataset prefixes ({} records)...", dataset.len());
    let request = RunRequest::SizeSweep { dataset, sizes };

    match run_on_worker(&config, request, &output, &message).await? {
        RunResponse::SweepResults(results) => output.print_sweep(&results),
        other => Err(unexpected(&other)),
    }
}
