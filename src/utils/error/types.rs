//! Error types for the batch collector

use thiserror::Error;

/// Boxed error carried by source error signals and handler failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for the batch collector
pub type Result<T> = std::result::Result<T, BatchError>;

/// Main error type for the batch collector
#[derive(Error, Debug)]
pub enum BatchError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The source emitted its error signal
    #[error("Source error after {count} items: {source}")]
    Source {
        count: u64,
        #[source]
        source: BoxError,
    },

    /// The batch handler failed (returned an error or panicked)
    #[error("Batch handler failed at item {count}: {source}")]
    Handler {
        count: u64,
        #[source]
        source: BoxError,
    },

    /// A recognised signal arrived with a payload it cannot carry
    #[error("Malformed '{event}' signal: {message}")]
    Signal { event: String, message: String },

    /// The source stopped producing signals before its end signal
    #[error("Source closed without '{end_event}' signal after {count} items")]
    SourceClosed { count: u64, end_event: String },

    /// The run was cancelled through its token
    #[error("Cancelled after {count} items")]
    Cancelled { count: u64 },

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
