//! Configuration loading utilities
//!
//! Options can come from YAML or JSON documents, a YAML file, or environment
//! variables. Every loader overlays onto the defaults and validates before
//! returning.

use super::options::BatchOptions;
use super::validation::Validate;
use crate::utils::error::{BatchError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Prefix of the environment variables read by [`BatchOptions::from_env`]
pub const ENV_PREFIX: &str = "STREAM_BATCH_";

impl BatchOptions {
    /// Validate and return the options
    pub fn validated(self) -> Result<Self> {
        self.validate().map_err(BatchError::Config)?;
        Ok(self)
    }

    /// Parse options from a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // An empty document means "all defaults"
        if content.trim().is_empty() {
            return Self::default().validated();
        }
        let options: Self = serde_yaml::from_str(content)?;
        options.validated()
    }

    /// Build options from a JSON value such as `{"batchSize": 3}`
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        let options: Self = serde_json::from_value(value)?;
        options.validated()
    }

    /// Load options from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading batch options from: {:?}", path);

        let content = tokio::fs::read_to_string(path).await?;
        let options = Self::from_yaml_str(&content)?;

        debug!("Batch options loaded: {:?}", options);
        Ok(options)
    }

    /// Load options from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Load options from `(name, value)` pairs shaped like environment variables
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut options = Self::default();

        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value = value.into();
            match name {
                "SIZE" => {
                    options.batch_size = value.trim().parse().map_err(|e| {
                        BatchError::config(format!("Invalid {}SIZE '{}': {}", ENV_PREFIX, value, e))
                    })?;
                }
                "DATA_EVENT" => options.data_event = value,
                "END_EVENT" => options.end_event = value,
                "ERROR_EVENT" => options.error_event = value,
                other => debug!("Ignoring unknown variable {}{}", ENV_PREFIX, other),
            }
        }

        options.validated()
    }
}
