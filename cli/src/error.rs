use lookup_harness::{ErrorReport, HarnessError};
use thiserror::Error;

/// Failures that originate in the CLI rather than the harness library
#[derive(Error, Debug)]
pub enum CliError {
    /// The worker answered a request with an error response
    #[error("{message}")]
    RunFailed { kind: String, message: String },

    /// The worker answered with a response of the wrong type
    #[error("Unexpected response from worker: {0}")]
    UnexpectedResponse(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<ErrorReport> for CliError {
    fn from(report: ErrorReport) -> Self {
        CliError::RunFailed {
            kind: report.kind,
            message: report.message,
        }
    }
}

/// Process exit code for an error returned by a command
pub fn exit_code(error: &anyhow::Error) -> i32 {
    if let Some(harness) = error.downcast_ref::<HarnessError>() {
        return if harness.is_caller_error() { 2 } else { 1 };
    }

    match error.downcast_ref::<CliError>() {
        Some(CliError::RunFailed { kind, .. }) if kind == "InvalidInput" => 2,
        Some(CliError::InvalidArgument(_)) => 2,
        _ => 1,
    }
}

/// Format error for user-friendly display
pub fn format_error(error: &anyhow::Error) -> String {
    let detail = error_chain(error);

    match error.downcast_ref::<HarnessError>() {
        Some(HarnessError::InvalidInput(reason)) if reason.contains("dataset") => format!(
            "{}\n\nDatasets must be a non-empty JSON array of records with unique integer `id` fields.",
            detail
        ),
        Some(HarnessError::ConcurrentRunRejected) => format!(
            "{}\n\nWait for the current run to finish before starting another.",
            detail
        ),
        Some(HarnessError::Config(_)) => format!(
            "{}\n\nTry running 'lookup-bench config show' to check your configuration.",
            detail
        ),
        _ => detail,
    }
}

/// Join the error chain, skipping causes already quoted by the message above them
fn error_chain(error: &anyhow::Error) -> String {
    let mut detail = String::new();
    for cause in error.chain() {
        let text = cause.to_string();
        if detail.contains(&text) {
            continue;
        }
        if !detail.is_empty() {
            detail.push_str(": ");
        }
        detail.push_str(&text);
    }
    detail
}
