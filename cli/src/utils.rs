use std::path::Path;

use anyhow::{Context, Result};
use lookup_harness::record::{dataset_from_json, sequential_dataset};
use lookup_harness::Record;

use crate::error::CliError;

/// Read a dataset from a JSON array of records
pub fn load_dataset(path: &Path) -> Result<Vec<Record>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading dataset {}", path.display()))?;
    let dataset = dataset_from_json(&content)
        .with_context(|| format!("parsing dataset {}", path.display()))?;

    tracing::info!("Loaded {} records from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Resolve a dataset from either a file or a synthetic size
pub fn resolve_dataset(path: Option<&Path>, size: Option<usize>) -> Result<Vec<Record>> {
    match (path, size) {
        (Some(path), _) => load_dataset(path),
        (None, Some(size)) => Ok(sequential_dataset(size)),
        (None, None) => Err(CliError::InvalidArgument(
            "either --dataset or --size is required".to_string(),
        )
        .into()),
    }
}

/// Label shown for a dataset when the user does not provide one
pub fn default_label(path: Option<&Path>, size: Option<usize>) -> String {
    match (path, size) {
        (Some(path), _) => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string()),
        (None, Some(size)) => format!("Synthetic {}", size),
        (None, None) => "dataset".to_string(),
    }
}

/// Parse sweep sizes such as `10,100,1000` or `Small=10,Large=1000`
pub fn parse_sizes(list: &str) -> Result<Vec<(String, usize)>> {
    let mut sizes = Vec::new();
    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (label, value) = match part.split_once('=') {
            Some((label, value)) => (label.trim().to_string(), value.trim()),
            None => (part.to_string(), part),
        };

        let size: usize = value
            .parse()
            .map_err(|_| CliError::InvalidArgument(format!("invalid sweep size '{}'", part)))?;
        if size == 0 {
            return Err(CliError::InvalidArgument("sweep sizes must be greater than zero".to_string()).into());
        }
        sizes.push((label, size));
    }

    if sizes.is_empty() {
        return Err(CliError::InvalidArgument("no sweep sizes given".to_string()).into());
    }
    Ok(sizes)
}
