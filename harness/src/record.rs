//! Dataset records
//!
//! The harness only cares about the integer `id` of each record. Any other
//! fields a caller supplies ride along untouched in [`Record::fields`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::HarnessError;

/// One dataset entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Lookup key. Ids are expected to be unique within a dataset.
    #[serde(alias = "log_id")]
    pub id: i64,

    /// Extra payload, ignored by every lookup strategy
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            fields: Map::new(),
        }
    }

    /// Attach an extra field to the record
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// Build a synthetic dataset with ids `1..=len`
pub fn sequential_dataset(len: usize) -> Vec<Record> {
    (1..=len as i64).map(Record::new).collect()
}

/// Largest id in the dataset, `None` when empty
pub fn max_id(dataset: &[Record]) -> Option<i64> {
    dataset.iter().map(|record| record.id).max()
}

/// Parse a dataset from a JSON array of records; malformed datasets are invalid input
pub fn dataset_from_json(json: &str) -> crate::Result<Vec<Record>> {
    serde_json::from_str(json)
        .map_err(|e| HarnessError::invalid_input(format!("malformed dataset: {}", e)))
}
