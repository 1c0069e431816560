//! Monotonic timing of single strategy invocations

use std::hint::black_box;
use std::time::{Duration, Instant};

use crate::record::Record;
use crate::strategies::LookupStrategy;

/// Timer utility for measuring execution time
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_nanos() as f64 / 1_000_000.0
    }

    pub fn restart(&mut self) {
        self.start = Instant::now();
    }
}

/// One timed invocation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub elapsed_ms: f64,
    pub matches: u64,
}

/// Run `strategy` once and measure only the call itself.
///
/// The match count goes through `black_box` and is returned so the lookup
/// cannot be elided.
pub fn time_once(strategy: LookupStrategy, dataset: &[Record], workload: &[i64]) -> Timing {
    let search = strategy.function();
    let timer = Timer::start();
    let matches = black_box(search(black_box(dataset), black_box(workload)));
    let elapsed_ms = timer.elapsed_ms();

    Timing {
        elapsed_ms,
        matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::generate;
    use crate::record::sequential_dataset;

    #[test]
    fn test_timer_is_monotonic() {
        let mut timer = Timer::start();
        let first = timer.elapsed_ms();
        std::thread::sleep(Duration::from_millis(2));
        let second = timer.elapsed_ms();
        assert!(second >= first);
        assert!(second >= 2.0);

        timer.restart();
        assert!(timer.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_time_once_reports_matches() {
        let dataset = sequential_dataset(100);
        let workload = generate(&dataset, 100, false).unwrap();

        for strategy in LookupStrategy::ALL {
            let timing = time_once(strategy, &dataset, &workload);
            assert_eq!(timing.matches, 50);
            assert!(timing.elapsed_ms >= 0.0);
        }
    }
}
