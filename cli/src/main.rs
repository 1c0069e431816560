use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lookup_harness::{HarnessConfig, HarnessError};

mod commands;
mod error;
mod output;
mod utils;

use commands::*;
use output::{OutputFormat, OutputManager};

#[derive(Parser)]
#[command(name = "lookup-bench")]
#[command(about = "Compare hashed, linear and brute-force id lookups over a dataset")]
#[command(version)]
#[command(long_about = "
lookup-bench times three lookup strategies (HashMap index, linear search with
early exit, and a full brute-force scan) against the same query workload, on a
background worker thread.

Examples:
  lookup-bench run --dataset logs.json                # Benchmark a JSON dataset
  lookup-bench run --size 1000 --format json          # Benchmark ids 1..=1000
  lookup-bench stress                                 # Scale-up / worst-case / memory-limited
  lookup-bench sweep --dataset logs.json --format csv # Small/Medium/Large prefixes
  lookup-bench config show                            # Show effective configuration
")]
struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    format: OutputFormatArg,

    /// Write results to a file instead of stdout
    #[arg(long, short, global = true)]
    output: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, env = "LOOKUP_BENCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OutputFormatArg {
    Table,
    Json,
    Csv,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Table => OutputFormat::Table,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Csv => OutputFormat::Csv,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Benchmark all strategies against one dataset
    Run(RunArgs),

    /// Run the fixed stress scenarios on synthetic data
    Stress(StressArgs),

    /// Benchmark growing prefixes of one dataset
    Sweep(SweepArgs),

    /// Manage lookup-bench configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = HarnessConfig::load_with_fallback(cli.config.as_ref());
    let logging = config
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();
    init_logging(&cli, &logging.level, logging.json);

    let result = match config {
        Ok(config) => run_command(cli, config).await,
        Err(e) => Err(HarnessError::from(e).into()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", error::format_error(&e));
        process::exit(error::exit_code(&e));
    }
}

async fn run_command(cli: Cli, config: HarnessConfig) -> anyhow::Result<()> {
    debug!(?config, "effective configuration");

    let colored =
        !cli.no_color && !cli.quiet && console::Term::stdout().features().colors_supported();
    let output = OutputManager::new(OutputFormat::from(cli.format), colored)
        .with_destination(cli.output)
        .with_quiet(cli.quiet);

    match cli.command {
        Commands::Run(args) => commands::run::run(args, config, output).await,
        Commands::Stress(args) => commands::stress::run(args, config, output).await,
        Commands::Sweep(args) => commands::sweep::run(args, config, output).await,
        Commands::Config(args) => commands::config::run(args, config, output).await,
    }
}

/// Log level chosen by the CLI flags, falling back to the configured level
fn log_level<'a>(cli: &Cli, configured: &'a str) -> &'a str {
    if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        configured
    }
}

fn init_logging(cli: &Cli, configured: &str, json: bool) {
    let level = log_level(cli, configured);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("lookup_bench={},lookup_harness={}", level, level))
    });

    // Logs go to stderr so stdout stays clean for json/csv output
    let (plain, structured) = if json {
        (None, Some(fmt::layer().json().with_writer(std::io::stderr)))
    } else {
        (Some(fmt::layer().with_writer(std::io::stderr)), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(structured)
        .init();

    info!("lookup-bench started");
}
