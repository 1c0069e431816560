//! Error handling for the lookup benchmark harness
//!
//! Every fallible harness operation returns [`HarnessError`]. Input problems are
//! reported before a run starts; nothing is retried internally.

use std::io;

use thiserror::Error;

/// The main error type for the harness
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Empty dataset, bad repetition counts or a malformed run request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A run was requested while another run's result is still pending
    #[error("A benchmark run is already in flight")]
    ConcurrentRunRejected,

    /// The background worker is gone or could not be started
    #[error("Worker unavailable: {0}")]
    WorkerUnavailable(String),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Metrics registry errors
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

/// Configuration related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Configuration parse error: {reason}")]
    ParseError { reason: String },

    #[error("Invalid configuration value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Configuration could not be written: {reason}")]
    SerializeError { reason: String },
}

impl HarnessError {
    /// Shorthand for building an [`HarnessError::InvalidInput`]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        HarnessError::InvalidInput(reason.into())
    }

    /// Stable identifier used in error responses sent back to callers
    pub fn kind(&self) -> &'static str {
        match self {
            HarnessError::InvalidInput(_) => "InvalidInput",
            HarnessError::ConcurrentRunRejected => "ConcurrentRunRejected",
            HarnessError::WorkerUnavailable(_) => "WorkerUnavailable",
            HarnessError::Config(_) => "Config",
            HarnessError::Io(_) => "Io",
            HarnessError::Serialization(_) => "Serialization",
            HarnessError::Metrics(_) => "Metrics",
        }
    }

    /// Whether the caller caused the failure (as opposed to the environment)
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            HarnessError::InvalidInput(_) | HarnessError::ConcurrentRunRejected
        )
    }
}

/// A specialized result type for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// A specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = HarnessError::invalid_input("dataset is empty");
        assert_eq!(error.to_string(), "Invalid input: dataset is empty");

        let error = HarnessError::ConcurrentRunRejected;
        assert_eq!(error.to_string(), "A benchmark run is already in flight");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(HarnessError::invalid_input("x").kind(), "InvalidInput");
        assert_eq!(HarnessError::ConcurrentRunRejected.kind(), "ConcurrentRunRejected");

        let config_error: HarnessError = ConfigError::ParseError {
            reason: "bad toml".to_string(),
        }
        .into();
        assert_eq!(config_error.kind(), "Config");
    }

    #[test]
    fn test_caller_errors() {
        assert!(HarnessError::invalid_input("x").is_caller_error());
        assert!(HarnessError::ConcurrentRunRejected.is_caller_error());
        assert!(!HarnessError::WorkerUnavailable("closed".to_string()).is_caller_error());
    }
}
