//! Configuration validation

use super::options::BatchOptions;
use tracing::debug;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for BatchOptions {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating batch options");

        if self.batch_size == 0 {
            return Err("batch_size must be greater than 0".to_string());
        }

        let events = [
            ("data_event", &self.data_event),
            ("end_event", &self.end_event),
            ("error_event", &self.error_event),
        ];
        for (field, name) in events {
            if name.trim().is_empty() {
                return Err(format!("{} cannot be empty", field));
            }
        }

        if self.data_event == self.end_event
            || self.data_event == self.error_event
            || self.end_event == self.error_event
        {
            return Err(format!(
                "Signal names must be distinct, got data='{}' end='{}' error='{}'",
                self.data_event, self.end_event, self.error_event
            ));
        }

        Ok(())
    }
}
