//! Logging setup
//!
//! The library only emits `tracing` events; applications and tests install a
//! subscriber with [`init_logging`].

mod level;

pub use level::{LogFormat, LogLevel};

use crate::utils::error::{BatchError, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Install a global fmt subscriber.
///
/// `RUST_LOG` wins over `level` when set. Fails if a global subscriber is
/// already installed.
pub fn init_logging(level: Option<LogLevel>, format: LogFormat) -> Result<()> {
    let level = level.unwrap_or(LogLevel::Info);
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(Level::from(level)).into())
        .from_env_lossy();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);

    let installed = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| BatchError::config(format!("Failed to install logger: {}", e)))
}

/// Subscriber for tests: output captured per test, repeated calls ignored
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
