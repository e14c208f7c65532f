//! Collector options

use serde::{Deserialize, Serialize};

/// Default number of items per batch
pub fn default_batch_size() -> usize {
    100
}

/// Default name of the per-item signal
pub fn default_data_event() -> String {
    "data".to_string()
}

/// Default name of the end-of-stream signal
pub fn default_end_event() -> String {
    "end".to_string()
}

/// Default name of the failure signal
pub fn default_error_event() -> String {
    "error".to_string()
}

/// Options recognised by the collector.
///
/// Every field has a default, so any partial document deserializes into a
/// complete set of options and unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Items per batch; the handler fires whenever the item count is a multiple of this
    #[serde(default = "default_batch_size", alias = "batchSize")]
    pub batch_size: usize,
    /// Signal name carrying one item
    #[serde(default = "default_data_event", alias = "dataEvent")]
    pub data_event: String,
    /// Signal name marking the end of the stream
    #[serde(default = "default_end_event", alias = "endEvent")]
    pub end_event: String,
    /// Signal name carrying a source failure
    #[serde(default = "default_error_event", alias = "errorEvent")]
    pub error_event: String,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            data_event: default_data_event(),
            end_event: default_end_event(),
            error_event: default_error_event(),
        }
    }
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_data_event(mut self, event: impl Into<String>) -> Self {
        self.data_event = event.into();
        self
    }

    pub fn with_end_event(mut self, event: impl Into<String>) -> Self {
        self.end_event = event.into();
        self
    }

    pub fn with_error_event(mut self, event: impl Into<String>) -> Self {
        self.error_event = event.into();
        self
    }

    /// Overlay `other` onto `self`: fields of `other` that differ from the
    /// defaults win.
    ///
    /// A field of `other` that equals its default is treated as unset, so
    /// an explicit `batch_size: 100` cannot override a base of 10. Apply
    /// such values with the `with_*` setters instead.
    pub fn merge(mut self, other: Self) -> Self {
        if other.batch_size != default_batch_size() {
            self.batch_size = other.batch_size;
        }
        if other.data_event != default_data_event() {
            self.data_event = other.data_event;
        }
        if other.end_event != default_end_event() {
            self.end_event = other.end_event;
        }
        if other.error_event != default_error_event() {
            self.error_event = other.error_event;
        }
        self
    }

    /// True when `event` is one of the three configured signal names
    pub fn recognises(&self, event: &str) -> bool {
        event == self.data_event || event == self.end_event || event == self.error_event
    }
}
