//! Core functionality of the collector
//!
//! Sources push signals, the collector buffers and flushes them, handlers
//! consume the flushed batches.

pub mod collector;
pub mod handler;
pub mod parser;
pub mod source;

pub use collector::{BatchCollector, stream_batch, stream_batch_with};
pub use handler::{BatchHandler, HandlerFn, handler_fn};
pub use parser::{Identity, ItemParser, ParserFn, parser_fn};
pub use source::{
    ChannelSource, Emitter, FlowControl, FlowHandle, Payload, SharedFlowControl, Signal,
    SignalSource, StreamSource, channel,
};
