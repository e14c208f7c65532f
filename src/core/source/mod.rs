//! Signal sources observed by the collector
//!
//! A source pushes named signals (one per item, one at the end, one on
//! failure) and accepts pause/resume commands. The collector only reads
//! signals and issues flow-control commands; it never creates or tears
//! down the source.

use crate::utils::error::BoxError;
use async_trait::async_trait;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

pub mod channel;
pub mod stream;


pub use channel::{ChannelSource, Emitter, FlowHandle, channel};
pub use stream::StreamSource;

/// Payload carried by a [`Signal`]
pub enum Payload<T> {
    /// One raw item
    Item(T),
    /// No payload, as carried by end signals
    Empty,
    /// A source failure
    Error(BoxError),
}

impl<T: fmt::Debug> fmt::Debug for Payload<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Item(item) => f.debug_tuple("Item").field(item).finish(),
            Payload::Empty => f.write_str("Empty"),
            Payload::Error(error) => f.debug_tuple("Error").field(&error.to_string()).finish(),
        }
    }
}

/// A named signal emitted by a source
#[derive(Debug)]
pub struct Signal<T> {
    /// Signal name, matched against the configured data/end/error names
    pub event: Cow<'static, str>,
    /// Signal payload
    pub payload: Payload<T>,
}

impl<T> Signal<T> {
    pub fn new(event: impl Into<Cow<'static, str>>, payload: Payload<T>) -> Self {
        Self {
            event: event.into(),
            payload,
        }
    }

    /// Item signal under the default `data` name
    pub fn data(item: T) -> Self {
        Self::new("data", Payload::Item(item))
    }

    /// End signal under the default `end` name
    pub fn end() -> Self {
        Self::new("end", Payload::Empty)
    }

    /// Error signal under the default `error` name
    pub fn error(error: impl Into<BoxError>) -> Self {
        Self::new("error", Payload::Error(error.into()))
    }

    pub fn event(&self) -> &str {
        &self.event
    }
}

/// Flow-control commands understood by a source (or by whatever feeds it)
#[cfg_attr(test, mockall::automock)]
pub trait FlowControl {
    /// Stop delivering data signals until [`FlowControl::resume`]
    fn pause(&self);

    /// Re-enable delivery after [`FlowControl::pause`]
    fn resume(&self);
}

impl<F: FlowControl + ?Sized> FlowControl for Arc<F> {
    fn pause(&self) {
        (**self).pause()
    }

    fn resume(&self) {
        (**self).resume()
    }
}

/// Shareable flow controller, as accepted for upstream throttling
pub type SharedFlowControl = Arc<dyn FlowControl + Send + Sync>;

/// A push-based producer of [`Signal`]s.
///
/// Contract expected by the collector:
/// - once `pause` has been called, no *new* data signals are produced until
///   `resume`; signals already in flight may still be returned;
/// - `next_signal` is cancel-safe, since the collector drops the pending
///   call whenever a batch handler completes first;
/// - `None` means the source is gone and will never produce again.
#[async_trait]
pub trait SignalSource: FlowControl + Send {
    /// Raw item type carried by data signals
    type Item: Send;

    /// Wait for the next signal
    async fn next_signal(&mut self) -> Option<Signal<Self::Item>>;
}
