//! Lookup strategies under test
//!
//! Each strategy answers the same question, how many queries hit a record, with
//! a different complexity profile. Strategies hold no state between calls;
//! hashing rebuilds its index on every invocation so each call pays its full
//! cost.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Signature shared by every lookup strategy
pub type StrategyFn = fn(&[Record], &[i64]) -> u64;

/// The strategies the harness compares, in reporting order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LookupStrategy {
    Hashing,
    Linear,
    BruteForce,
}

impl LookupStrategy {
    /// Fixed execution and reporting order
    pub const ALL: [LookupStrategy; 3] = [
        LookupStrategy::Hashing,
        LookupStrategy::Linear,
        LookupStrategy::BruteForce,
    ];

    /// Display name used in results
    pub fn name(&self) -> &'static str {
        match self {
            LookupStrategy::Hashing => "Hashing (HashMap)",
            LookupStrategy::Linear => "Linear Search",
            LookupStrategy::BruteForce => "Brute Force",
        }
    }

    pub fn function(&self) -> StrategyFn {
        match self {
            LookupStrategy::Hashing => hashing_search,
            LookupStrategy::Linear => linear_search,
            LookupStrategy::BruteForce => brute_force_search,
        }
    }

    /// Count the queries that match a record
    pub fn search(&self, dataset: &[Record], queries: &[i64]) -> u64 {
        (self.function())(dataset, queries)
    }
}

impl fmt::Display for LookupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Build an id -> record map, then test each query for membership
pub fn hashing_search(dataset: &[Record], queries: &[i64]) -> u64 {
    let mut index: HashMap<i64, &Record> = HashMap::with_capacity(dataset.len());
    for record in dataset {
        index.insert(record.id, record);
    }

    queries.iter().filter(|id| index.contains_key(*id)).count() as u64
}

/// Scan from the start for each query, stopping at the first match
pub fn linear_search(dataset: &[Record], queries: &[i64]) -> u64 {
    let mut found = 0;
    for &query in queries {
        for record in dataset {
            if record.id == query {
                found += 1;
                break;
            }
        }
    }
    found
}

/// Scan the whole dataset for each query with no early exit
pub fn brute_force_search(dataset: &[Record], queries: &[i64]) -> u64 {
    let mut found = 0;
    for &query in queries {
        for record in dataset {
            if record.id == query {
                found += 1;
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::generate;
    use crate::record::sequential_dataset;
    use proptest::prelude::*;

    #[test]
    fn test_strategies_agree_on_mixed_workload() {
        let dataset = sequential_dataset(200);
        let queries = generate(&dataset, 300, false).unwrap();

        for strategy in LookupStrategy::ALL {
            assert_eq!(strategy.search(&dataset, &queries), 150, "{}", strategy);
        }
    }

    #[test]
    fn test_strategies_agree_on_all_misses() {
        let dataset = sequential_dataset(64);
        let queries = generate(&dataset, 128, true).unwrap();

        for strategy in LookupStrategy::ALL {
            assert_eq!(strategy.search(&dataset, &queries), 0, "{}", strategy);
        }
    }

    #[test]
    fn test_repeated_queries_count_each_time() {
        let dataset = sequential_dataset(4);
        let queries = vec![2, 2, 9, 4];

        assert_eq!(hashing_search(&dataset, &queries), 3);
        assert_eq!(linear_search(&dataset, &queries), 3);
        assert_eq!(brute_force_search(&dataset, &queries), 3);
    }

    #[test]
    fn test_empty_inputs() {
        let dataset = sequential_dataset(4);
        for strategy in LookupStrategy::ALL {
            assert_eq!(strategy.search(&dataset, &[]), 0);
            assert_eq!(strategy.search(&[], &[1, 2]), 0);
        }
    }

    #[test]
    fn test_strategy_order_and_names() {
        let names: Vec<&str> = LookupStrategy::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["Hashing (HashMap)", "Linear Search", "Brute Force"]);
    }

    proptest! {
        #[test]
        fn prop_strategies_return_identical_counts(
            ids in prop::collection::hash_set(-1_000i64..1_000, 1..80),
            count in 0usize..200,
            all_misses in any::<bool>(),
        ) {
            let dataset: Vec<Record> = ids.into_iter().map(Record::new).collect();
            let queries = generate(&dataset, count, all_misses).unwrap();

            let hashing = hashing_search(&dataset, &queries);
            prop_assert_eq!(hashing, linear_search(&dataset, &queries));
            prop_assert_eq!(hashing, brute_force_search(&dataset, &queries));
        }

        #[test]
        fn prop_arbitrary_queries_agree(
            ids in prop::collection::hash_set(any::<i64>(), 0..40),
            queries in prop::collection::vec(any::<i64>(), 0..60),
        ) {
            let dataset: Vec<Record> = ids.into_iter().map(Record::new).collect();
            let hashing = hashing_search(&dataset, &queries);
            prop_assert_eq!(hashing, linear_search(&dataset, &queries));
            prop_assert_eq!(hashing, brute_force_search(&dataset, &queries));
        }
    }
}
