use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use lookup_harness::{AlgorithmResult, BenchmarkResult, HarnessConfig, ScenarioResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

pub struct OutputManager {
    format: OutputFormat,
    colored: bool,
    quiet: bool,
    destination: Option<PathBuf>,
}

impl OutputManager {
    pub fn new(format: OutputFormat, colored: bool) -> Self {
        Self {
            format,
            colored,
            quiet: false,
            destination: None,
        }
    }

    /// Write rendered results to `path` instead of stdout
    pub fn with_destination(mut self, path: Option<PathBuf>) -> Self {
        self.destination = path;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn print_benchmark(&self, result: &BenchmarkResult) -> Result<()> {
        let rendered = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(result)?,
            OutputFormat::Csv => benchmark_csv(std::slice::from_ref(result))?,
            OutputFormat::Table => self.benchmark_table(result),
        };
        self.emit(rendered)
    }

    pub fn print_stress_report(&self, report: &[ScenarioResult]) -> Result<()> {
        let rendered = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report)?,
            OutputFormat::Csv => stress_csv(report)?,
            OutputFormat::Table => self.stress_table(report),
        };
        self.emit(rendered)
    }

    pub fn print_sweep(&self, results: &[BenchmarkResult]) -> Result<()> {
        let rendered = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(results)?,
            OutputFormat::Csv => benchmark_csv(results)?,
            OutputFormat::Table => self.sweep_table(results),
        };
        self.emit(rendered)
    }

    pub fn print_config(&self, config: &HarnessConfig) -> Result<()> {
        let rendered = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(config)?,
            OutputFormat::Table | OutputFormat::Csv => toml::to_string_pretty(config)?,
        };
        self.emit(rendered)
    }

    pub fn print_success(&self, message: &str) {
        if self.quiet {
            return;
        }
        if self.colored {
            eprintln!("{} {}", style("✓").green().bold(), message);
        } else {
            eprintln!("✓ {}", message);
        }
    }

    /// Spinner shown on stderr while a run is in flight
    pub fn create_spinner(&self, message: &str) -> ProgressBar {
        if self.quiet || !console::Term::stderr().is_term() {
            return ProgressBar::hidden();
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
                .template("{spinner:.green} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    fn emit(&self, rendered: String) -> Result<()> {
        match &self.destination {
            Some(path) => {
                std::fs::write(path, &rendered)
                    .with_context(|| format!("writing results to {}", path.display()))?;
                tracing::info!("Results written to: {}", path.display());
                self.print_success(&format!("Results written to {}", path.display()));
            }
            None => println!("{}", rendered.trim_end()),
        }
        Ok(())
    }

    fn heading(&self, text: &str) -> String {
        if self.colored && self.destination.is_none() {
            style(text).bold().blue().to_string()
        } else {
            text.to_string()
        }
    }

    fn benchmark_table(&self, result: &BenchmarkResult) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}",
            self.heading(&format!(
                "{} ({} records, {} queries, {} warm-up / {} timed runs)",
                result.dataset_label,
                result.dataset_length,
                result.query_count,
                result.warmup_runs,
                result.timed_runs
            ))
        );
        out.push_str(&algorithm_table(&result.algorithms));
        out
    }

    fn stress_table(&self, report: &[ScenarioResult]) -> String {
        let mut out = String::new();
        for (i, scenario) in report.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "{}", self.heading(&scenario.name));
            out.push_str(&algorithm_table(&scenario.algorithms));
        }
        out
    }

    /// One row per dataset, one column per strategy, like the classic comparison table
    fn sweep_table(&self, results: &[BenchmarkResult]) -> String {
        let mut header = vec!["Dataset".to_string()];
        if let Some(first) = results.first() {
            header.extend(first.algorithms.iter().map(|a| format!("{} (ms)", a.name)));
        }

        let rows: Vec<Vec<String>> = results
            .iter()
            .map(|result| {
                let mut row = vec![format!("{} ({})", result.dataset_label, result.dataset_length)];
                row.extend(result.algorithms.iter().map(|a| format!("{:.4}", a.avg_ms)));
                row
            })
            .collect();

        let mut out = String::new();
        let _ = writeln!(out, "{}", self.heading("Average time per run"));
        out.push_str(&render_table(&header, &rows));
        out
    }
}

fn algorithm_table(algorithms: &[AlgorithmResult]) -> String {
    let header: Vec<String> = ["Algorithm", "Avg (ms)", "Min (ms)", "Max (ms)", "Matches"]
        .iter()
        .map(|h| h.to_string())
        .collect();

    let rows: Vec<Vec<String>> = algorithms
        .iter()
        .map(|a| {
            vec![
                a.name.clone(),
                format!("{:.4}", a.avg_ms),
                format!("{:.4}", a.min_ms),
                format!("{:.4}", a.max_ms),
                a.matches.to_string(),
            ]
        })
        .collect();

    render_table(&header, &rows)
}

/// Left-align the first column, right-align the rest
fn render_table(header: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let format_row = |cells: &[String]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let width = widths.get(i).copied().unwrap_or(0);
                if i == 0 {
                    format!("{:<width$}", cell, width = width)
                } else {
                    format!("{:>width$}", cell, width = width)
                }
            })
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let mut out = String::new();
    let header_line = format_row(header);
    let _ = writeln!(out, "{}", header_line);
    let _ = writeln!(out, "{}", "-".repeat(header_line.chars().count()));
    for row in rows {
        let _ = writeln!(out, "{}", format_row(row));
    }
    out
}

pub fn benchmark_csv(results: &[BenchmarkResult]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "dataset", "records", "queries", "algorithm", "avg_ms", "min_ms", "max_ms", "matches",
    ])?;

    for result in results {
        for a in &result.algorithms {
            writer.write_record([
                result.dataset_label.clone(),
                result.dataset_length.to_string(),
                result.query_count.to_string(),
                a.name.clone(),
                a.avg_ms.to_string(),
                a.min_ms.to_string(),
                a.max_ms.to_string(),
                a.matches.to_string(),
            ])?;
        }
    }

    finish_csv(writer)
}

pub fn stress_csv(report: &[ScenarioResult]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["scenario", "algorithm", "avg_ms", "min_ms", "max_ms", "matches"])?;

    for scenario in report {
        for a in &scenario.algorithms {
            writer.write_record([
                scenario.name.clone(),
                a.name.clone(),
                a.avg_ms.to_string(),
                a.min_ms.to_string(),
                a.max_ms.to_string(),
                a.matches.to_string(),
            ])?;
        }
    }

    finish_csv(writer)
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV output: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookup_harness::{record::sequential_dataset, run, RunOptions};

    fn sample_result(label: &str, size: usize) -> BenchmarkResult {
        let options = RunOptions {
            warmup_runs: 0,
            timed_runs: 1,
            query_count: 10,
        };
        run(&sequential_dataset(size), label, &options).unwrap()
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_benchmark_csv() {
        let csv = benchmark_csv(&[sample_result("Small", 10)]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("dataset,records,queries,algorithm"));
        assert!(lines[1].starts_with("Small,10,10,Hashing (HashMap),"));
        assert!(lines[3].ends_with(",5"));
    }

    #[test]
    fn test_stress_csv() {
        let report = vec![ScenarioResult {
            name: "Memory-limited".to_string(),
            algorithms: sample_result("Memory-limited", 100).algorithms,
        }];
        let csv = stress_csv(&report).unwrap();
        assert_eq!(csv.lines().count(), 4);
        assert!(csv.contains("Memory-limited,Brute Force,"));
    }

    #[test]
    fn test_tables_render_every_strategy() {
        let output = OutputManager::new(OutputFormat::Table, false);
        let table = output.benchmark_table(&sample_result("Small", 10));

        assert!(table.starts_with("Small (10 records, 10 queries"));
        for name in ["Hashing (HashMap)", "Linear Search", "Brute Force"] {
            assert!(table.contains(name), "{}", name);
        }

        let sweep = output.sweep_table(&[sample_result("Small", 10), sample_result("Medium", 100)]);
        assert!(sweep.contains("Linear Search (ms)"));
        assert!(sweep.contains("Medium (100)"));
    }

    #[test]
    fn test_render_table_alignment() {
        let header = vec!["Name".to_string(), "Value".to_string()];
        let rows = vec![vec!["a".to_string(), "1".to_string()]];
        let table = render_table(&header, &rows);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "Name | Value");
        assert_eq!(lines[1], "------------");
        assert_eq!(lines[2], "a    |     1");
    }
}
