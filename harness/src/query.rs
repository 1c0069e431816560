//! Synthetic query workloads
//!
//! Workloads are built deterministically from the dataset's prefix so two runs
//! over the same dataset always see the same queries. Miss keys count upwards
//! from the largest id in the dataset and can never collide with a record.

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};
use crate::record::{max_id, Record};

/// Default number of queries per workload
pub const DEFAULT_QUERY_COUNT: usize = 10_000;

/// A sequence of ids to look up, shared by every strategy in a run
pub type Workload = Vec<i64>;

/// How hits and misses are mixed into a workload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryPolicy {
    /// Half hits from the dataset prefix, the rest guaranteed misses
    #[default]
    Mixed,
    /// Every query is a guaranteed miss
    AllMisses,
}

impl QueryPolicy {
    pub fn from_all_misses(all_misses: bool) -> Self {
        if all_misses {
            QueryPolicy::AllMisses
        } else {
            QueryPolicy::Mixed
        }
    }
}

/// Generate exactly `count` queries for `dataset`.
///
/// With `all_misses` unset the first `min(count / 2, dataset.len())` queries
/// are ids of the leading records; the remainder are `max_id + 1`,
/// `max_id + 2`, ... An empty dataset is rejected because it has no `max_id`.
pub fn generate(dataset: &[Record], count: usize, all_misses: bool) -> Result<Workload> {
    generate_with_policy(dataset, count, QueryPolicy::from_all_misses(all_misses))
}

pub fn generate_with_policy(
    dataset: &[Record],
    count: usize,
    policy: QueryPolicy,
) -> Result<Workload> {
    let max = max_id(dataset)
        .ok_or_else(|| HarnessError::invalid_input("cannot build queries for an empty dataset"))?;

    let hits = match policy {
        QueryPolicy::Mixed => (count / 2).min(dataset.len()),
        QueryPolicy::AllMisses => 0,
    };
    let misses = count - hits;

    // Last miss key is max + misses; refuse rather than wrap into real ids.
    if misses > 0 {
        i64::try_from(misses)
            .ok()
            .and_then(|m| max.checked_add(m))
            .ok_or_else(|| {
                HarnessError::invalid_input(format!(
                    "{} miss queries above id {} overflow the id range",
                    misses, max
                ))
            })?;
    }

    let mut workload = Vec::with_capacity(count);
    workload.extend(dataset[..hits].iter().map(|record| record.id));
    workload.extend((1..=misses as i64).map(|offset| max + offset));

    tracing::trace!(count, hits, misses, ?policy, "generated workload");
    Ok(workload)
}
