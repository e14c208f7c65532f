//! Configuration management for the batch collector
//!
//! This module handles defaults, overlaying, loading and validation of collector options.

mod loader;
pub mod options;
pub mod validation;


pub use loader::ENV_PREFIX;
pub use options::{
    BatchOptions, default_batch_size, default_data_event, default_end_event, default_error_event,
};
pub use validation::Validate;
