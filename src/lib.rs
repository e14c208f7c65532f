//! # stream-batcher
//!
//! Consume a push-based signal stream, accumulate items into fixed-size
//! batches and hand each batch to an async handler, pausing the source while
//! the handler runs and resuming it afterwards.
//!
//! ## Features
//!
//! - **Pause/resume backpressure**: at most one batch is ever in flight
//! - **Configurable signals**: data/end/error signal names are options
//! - **Item parsing**: optional per-item transform before buffering
//! - **Upstream throttling**: pause a different source than the one observed
//! - **Cancellation**: abort a run mid-stream with a `CancellationToken`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stream_batcher::{BatchOptions, BoxError, channel, handler_fn, stream_batch};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (emitter, mut source) = channel::<u32>(16);
//!
//!     tokio::spawn(async move {
//!         for n in 0..250 {
//!             emitter.data(n).await?;
//!         }
//!         emitter.end().await
//!     });
//!
//!     let mut handler = handler_fn(|batch: Vec<u32>, total: u64| async move {
//!         println!("{} items, {} so far", batch.len(), total);
//!         Ok::<(), BoxError>(())
//!     });
//!
//!     let options = BatchOptions::new().with_batch_size(100);
//!     let total = stream_batch(&mut source, &mut handler, options).await?;
//!     assert_eq!(total, 250);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::BatchOptions;
pub use core::{
    BatchCollector, BatchHandler, ChannelSource, Emitter, FlowControl, FlowHandle, Identity,
    ItemParser, Payload, SharedFlowControl, Signal, SignalSource, StreamSource, channel,
    handler_fn, parser_fn, stream_batch, stream_batch_with,
};
pub use utils::error::{BatchError, BoxError, Result};

// Cancellation token accepted by `BatchCollector::run_until_cancelled`
pub use tokio_util::sync::CancellationToken;
