use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use lookup_harness::{HarnessConfig, RunRequest, RunResponse};
use tracing::info;

use super::{run_on_worker, unexpected, RepetitionArgs};
use crate::output::OutputManager;
use crate::utils;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// JSON file containing an array of records with integer `id` fields
    #[arg(long, short, conflicts_with = "size", required_unless_present = "size")]
    pub dataset: Option<PathBuf>,

    /// Benchmark a synthetic dataset with ids 1..=SIZE instead of a file
    #[arg(long, short)]
    pub size: Option<usize>,

    /// Label reported with the results
    #[arg(long, short)]
    pub label: Option<String>,

    /// Number of queries in the generated workload
    #[arg(long)]
    pub queries: Option<usize>,

    #[command(flatten)]
    pub repetitions: RepetitionArgs,
}

pub async fn run(args: RunArgs, mut config: HarnessConfig, output: OutputManager) -> Result<()> {
    args.repetitions.apply(&mut config);
    if let Some(queries) = args.queries {
        config.benchmark.query_count = queries;
    }

    let dataset = utils::resolve_dataset(args.dataset.as_deref(), args.size)?;
    let label = args
        .label
        .unwrap_or_else(|| utils::default_label(args.dataset.as_deref(), args.size));

    info!("Benchmarking '{}' ({} records)", label, dataset.len());
    let message = format!("Benchmarking {} ({} records)...", label, dataset.len());
    let request = RunRequest::Benchmark { dataset, label };

    match run_on_worker(&config, request, &output, &message).await? {
        RunResponse::Results(result) => output.print_benchmark(&result),
        other => Err(unexpected(&other)),
    }
}
