//! Helper functions for creating and inspecting specific error types

use super::types::{BatchError, BoxError};

/// Helper functions for creating specific errors
impl BatchError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn source_error<E: Into<BoxError>>(count: u64, error: E) -> Self {
        Self::Source {
            count,
            source: error.into(),
        }
    }

    pub fn handler<E: Into<BoxError>>(count: u64, error: E) -> Self {
        Self::Handler {
            count,
            source: error.into(),
        }
    }

    pub fn signal<E: Into<String>, M: Into<String>>(event: E, message: M) -> Self {
        Self::Signal {
            event: event.into(),
            message: message.into(),
        }
    }

    pub fn source_closed<S: Into<String>>(count: u64, end_event: S) -> Self {
        Self::SourceClosed {
            count,
            end_event: end_event.into(),
        }
    }

    pub fn cancelled(count: u64) -> Self {
        Self::Cancelled { count }
    }

    /// Number of items observed before the run failed, when the error came from a run
    pub fn count(&self) -> Option<u64> {
        match self {
            Self::Source { count, .. }
            | Self::Handler { count, .. }
            | Self::SourceClosed { count, .. }
            | Self::Cancelled { count } => Some(*count),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
