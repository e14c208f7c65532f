//! Error handling for the batch collector
//!
//! This module defines the error type returned by every collector run and config loader.

mod helpers;
mod types;

pub use types::{BatchError, BoxError, Result};
