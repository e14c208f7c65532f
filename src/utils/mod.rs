//! Utility modules for the collector
//!
//! - **error**: Error type and result alias
//! - **logging**: Tracing subscriber setup

pub mod error;
pub mod logging;

pub use error::{BatchError, BoxError, Result};
pub use logging::{LogFormat, LogLevel, init_logging};
