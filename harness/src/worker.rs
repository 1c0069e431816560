//! Background worker boundary
//!
//! Runs are CPU-bound and never yield, so they execute on a dedicated OS thread
//! instead of the caller's thread or an async executor. Callers talk to the
//! worker through a pair of bounded channels: every accepted [`RunRequest`]
//! produces exactly one [`RunResponse`].
//!
//! The worker processes one request at a time. Callers must not submit a new
//! run while a previous run's result is pending; [`RunGate`] enforces this on
//! the caller side.

use std::thread;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::metrics::HarnessMetrics;
use crate::record::Record;
use crate::runner::{self, BenchmarkResult, RunOptions};
use crate::scenario::{default_sweep_sizes, run_size_sweep, run_stress_suite, StressReport};
use crate::timer::Timer;

/// A run request sent to the worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RunRequest {
    /// Benchmark every strategy against a caller supplied dataset
    Benchmark { dataset: Vec<Record>, label: String },

    /// Run the fixed three-scenario stress suite
    StressTest,

    /// Benchmark labelled prefixes of a dataset; empty `sizes` means Small/Medium/Large
    SizeSweep {
        dataset: Vec<Record>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        sizes: Vec<(String, usize)>,
    },
}

/// The single response produced for a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum RunResponse {
    Results(BenchmarkResult),
    StressResults(StressReport),
    SweepResults(Vec<BenchmarkResult>),
    Error(ErrorReport),
}

/// Failure reported back in place of a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: String,
    pub message: String,
}

impl From<&HarnessError> for ErrorReport {
    fn from(error: &HarnessError) -> Self {
        Self {
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

impl RunRequest {
    /// Message type name, also used as the metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            RunRequest::Benchmark { .. } => "benchmark",
            RunRequest::StressTest => "stressTest",
            RunRequest::SizeSweep { .. } => "sizeSweep",
        }
    }

    /// Parse a request message; malformed messages are invalid input
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| HarnessError::invalid_input(format!("malformed run request: {}", e)))
    }

    /// Reject requests that cannot start
    pub fn validate(&self) -> Result<()> {
        match self {
            RunRequest::Benchmark { dataset, label } if dataset.is_empty() => Err(
                HarnessError::invalid_input(format!("dataset '{}' is empty", label)),
            ),
            RunRequest::SizeSweep { dataset, .. } if dataset.is_empty() => {
                Err(HarnessError::invalid_input("cannot sweep an empty dataset"))
            }
            RunRequest::SizeSweep { sizes, .. } if sizes.iter().any(|(_, size)| *size == 0) => {
                Err(HarnessError::invalid_input("sweep sizes must be greater than zero"))
            }
            _ => Ok(()),
        }
    }
}

impl RunResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, RunResponse::Error(_))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Execute a request synchronously on the current thread
pub fn execute(request: RunRequest, options: &RunOptions) -> Result<RunResponse> {
    match request {
        RunRequest::Benchmark { dataset, label } => {
            Ok(RunResponse::Results(runner::run(&dataset, &label, options)?))
        }
        RunRequest::StressTest => Ok(RunResponse::StressResults(run_stress_suite(options)?)),
        RunRequest::SizeSweep { dataset, sizes } => {
            let sizes = if sizes.is_empty() {
                default_sweep_sizes()
            } else {
                sizes
            };
            Ok(RunResponse::SweepResults(run_size_sweep(
                &dataset, &sizes, options,
            )?))
        }
    }
}

/// Spawns the background execution context
pub struct BenchmarkWorker;

impl BenchmarkWorker {
    /// Start a worker thread configured from `config`
    pub fn spawn(config: &HarnessConfig) -> Result<WorkerHandle> {
        let options = config.run_options();
        options.validate()?;
        config.validate()?;

        let metrics = if config.metrics.enabled {
            Some(HarnessMetrics::new()?)
        } else {
            None
        };

        let capacity = config.worker.queue_capacity;
        let (request_tx, request_rx) = mpsc::channel::<RunRequest>(capacity);
        let (response_tx, response_rx) = mpsc::channel::<RunResponse>(capacity);

        let thread_metrics = metrics.clone();
        let thread = thread::Builder::new()
            .name(config.worker.thread_name.clone())
            .spawn(move || worker_loop(request_rx, response_tx, options, thread_metrics))
            .map_err(|e| HarnessError::WorkerUnavailable(format!("failed to spawn worker: {}", e)))?;

        info!(thread = %config.worker.thread_name, "benchmark worker started");

        Ok(WorkerHandle {
            request_tx: Some(request_tx),
            response_rx,
            thread: Some(thread),
            metrics,
        })
    }
}

fn worker_loop(
    mut requests: mpsc::Receiver<RunRequest>,
    responses: mpsc::Sender<RunResponse>,
    options: RunOptions,
    metrics: Option<HarnessMetrics>,
) {
    while let Some(request) = requests.blocking_recv() {
        let response = process(request, &options, metrics.as_ref());
        if responses.blocking_send(response).is_err() {
            debug!("response channel closed, stopping worker");
            break;
        }
    }
    debug!("benchmark worker exiting");
}

fn process(request: RunRequest, options: &RunOptions, metrics: Option<&HarnessMetrics>) -> RunResponse {
    let kind = request.kind();
    let timer = Timer::start();
    debug!(kind, "worker picked up request");

    match execute(request, options) {
        Ok(response) => {
            if let Some(metrics) = metrics {
                metrics.record_run(kind, timer.elapsed().as_secs_f64());
                if let RunResponse::Results(result) = &response {
                    metrics.record_algorithms(&result.algorithms);
                }
            }
            info!(kind, elapsed_ms = timer.elapsed_ms(), "run finished");
            response
        }
        Err(error) => {
            error!(kind, "run failed: {}", error);
            if let Some(metrics) = metrics {
                metrics.record_failure();
            }
            RunResponse::Error(ErrorReport::from(&error))
        }
    }
}

/// Caller-side handle to a running worker
#[derive(Debug)]
pub struct WorkerHandle {
    request_tx: Option<mpsc::Sender<RunRequest>>,
    response_rx: mpsc::Receiver<RunResponse>,
    thread: Option<thread::JoinHandle<()>>,
    metrics: Option<HarnessMetrics>,
}

impl WorkerHandle {
    /// Validate and enqueue a request. Invalid requests never reach the worker.
    pub async fn submit(&self, request: RunRequest) -> Result<()> {
        request.validate()?;
        self.sender()?
            .send(request)
            .await
            .map_err(|_| HarnessError::WorkerUnavailable("worker has stopped".to_string()))
    }

    /// Blocking variant of [`submit`](Self::submit) for callers outside an async runtime
    pub fn submit_blocking(&self, request: RunRequest) -> Result<()> {
        request.validate()?;
        self.sender()?
            .blocking_send(request)
            .map_err(|_| HarnessError::WorkerUnavailable("worker has stopped".to_string()))
    }

    /// Wait for the next response; `None` once the worker has stopped
    pub async fn recv(&mut self) -> Option<RunResponse> {
        self.response_rx.recv().await
    }

    /// Blocking variant of [`recv`](Self::recv) for callers outside an async runtime
    pub fn recv_blocking(&mut self) -> Option<RunResponse> {
        self.response_rx.blocking_recv()
    }

    /// Metrics recorded by the worker, when enabled
    pub fn metrics(&self) -> Option<&HarnessMetrics> {
        self.metrics.as_ref()
    }

    /// Stop accepting requests and wait for the worker thread to exit.
    ///
    /// A run already in progress finishes first; its response is discarded.
    pub fn shutdown(mut self) -> Result<()> {
        self.request_tx.take();
        self.response_rx.close();

        if let Some(thread) = self.thread.take() {
            thread
                .join()
                .map_err(|_| HarnessError::WorkerUnavailable("worker thread panicked".to_string()))?;
        }
        info!("benchmark worker stopped");
        Ok(())
    }

    fn sender(&self) -> Result<&mpsc::Sender<RunRequest>> {
        self.request_tx
            .as_ref()
            .ok_or_else(|| HarnessError::WorkerUnavailable("worker is shutting down".to_string()))
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        // Closing both channels lets the thread exit after its current run.
        self.request_tx.take();
        self.response_rx.close();
    }
}

/// Caller-side admission control: at most one run in flight per worker
pub struct RunGate {
    handle: WorkerHandle,
    in_flight: Option<&'static str>,
}

impl RunGate {
    pub fn new(handle: WorkerHandle) -> Self {
        Self {
            handle,
            in_flight: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Kind of the run currently in flight
    pub fn in_flight(&self) -> Option<&'static str> {
        self.in_flight
    }

    /// Submit a run unless one is already pending
    pub async fn start(&mut self, request: RunRequest) -> Result<()> {
        if let Some(active) = self.in_flight {
            warn!(
                active,
                rejected = request.kind(),
                "rejecting run request while another run is pending"
            );
            return Err(HarnessError::ConcurrentRunRejected);
        }

        let kind = request.kind();
        self.handle.submit(request).await?;
        self.in_flight = Some(kind);
        Ok(())
    }

    /// Wait for the pending run's response and free the slot
    pub async fn next_result(&mut self) -> Result<RunResponse> {
        if self.in_flight.is_none() {
            return Err(HarnessError::invalid_input("no run is in flight"));
        }

        let response = self.handle.recv().await;
        self.in_flight = None;
        response.ok_or_else(|| {
            HarnessError::WorkerUnavailable("worker stopped before responding".to_string())
        })
    }

    /// Start a run and wait for its response
    pub async fn run(&mut self, request: RunRequest) -> Result<RunResponse> {
        self.start(request).await?;
        self.next_result().await
    }

    pub fn into_inner(self) -> WorkerHandle {
        self.handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::sequential_dataset;
    use serde_json::json;

    #[test]
    fn test_request_message_shapes() {
        let request = RunRequest::from_json(
            r#"{"type": "benchmark", "dataset": [{"log_id": 1}, {"id": 2}], "label": "Small"}"#,
        )
        .unwrap();
        match &request {
            RunRequest::Benchmark { dataset, label } => {
                assert_eq!(dataset.len(), 2);
                assert_eq!(label, "Small");
            }
            other => panic!("unexpected request: {:?}", other),
        }
        assert_eq!(request.kind(), "benchmark");

        let request = RunRequest::from_json(r#"{"type": "stressTest"}"#).unwrap();
        assert_eq!(request, RunRequest::StressTest);
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({"type": "stressTest"}));

        let request = RunRequest::from_json(r#"{"type": "sizeSweep", "dataset": [{"id": 1}]}"#)
            .unwrap();
        assert_eq!(request.kind(), "sizeSweep");
    }

    #[test]
    fn test_malformed_request_is_invalid_input() {
        for json in [r#"{"type": "explode"}"#, r#"{"type": "benchmark"}"#, "[]"] {
            let error = RunRequest::from_json(json).unwrap_err();
            assert!(matches!(error, HarnessError::InvalidInput(_)), "{}", json);
        }
    }

    #[test]
    fn test_request_validation() {
        let empty = RunRequest::Benchmark {
            dataset: Vec::new(),
            label: "Empty".to_string(),
        };
        assert!(matches!(empty.validate(), Err(HarnessError::InvalidInput(_))));

        let sweep = RunRequest::SizeSweep {
            dataset: sequential_dataset(3),
            sizes: vec![("Zero".to_string(), 0)],
        };
        assert!(sweep.validate().is_err());

        assert!(RunRequest::StressTest.validate().is_ok());
    }

    #[test]
    fn test_execute_benchmark() {
        let options = RunOptions {
            warmup_runs: 1,
            timed_runs: 1,
            query_count: 10,
        };
        let request = RunRequest::Benchmark {
            dataset: sequential_dataset(10),
            label: "Small".to_string(),
        };

        match execute(request, &options).unwrap() {
            RunResponse::Results(result) => {
                assert_eq!(result.dataset_length, 10);
                assert_eq!(result.algorithms.len(), 3);
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_error_response_shape() {
        let error = HarnessError::invalid_input("dataset 'Empty' is empty");
        let response = RunResponse::Error(ErrorReport::from(&error));
        assert!(response.is_error());

        let value: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
        assert_eq!(value["type"], "error");
        assert_eq!(value["payload"]["kind"], "InvalidInput");
    }

    #[test]
    fn test_blocking_round_trip() {
        let mut config = HarnessConfig::default();
        config.benchmark.warmup_runs = 0;
        config.benchmark.timed_runs = 1;
        config.benchmark.query_count = 8;

        let mut handle = BenchmarkWorker::spawn(&config).unwrap();
        handle
            .submit_blocking(RunRequest::Benchmark {
                dataset: sequential_dataset(8),
                label: "Blocking".to_string(),
            })
            .unwrap();

        let response = handle.recv_blocking().unwrap();
        assert!(matches!(response, RunResponse::Results(ref r) if r.dataset_label == "Blocking"));
        handle.shutdown().unwrap();
    }
}
