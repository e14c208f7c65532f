//! Adapter turning a fallible [`Stream`] into a signal source

use super::channel::FlowHandle;
use super::{FlowControl, Payload, Signal, SignalSource};
use crate::utils::error::BoxError;
use async_trait::async_trait;
use futures::stream::{Fuse, Stream, StreamExt};
use std::borrow::Cow;
use tokio::sync::watch;

/// Signal source over a `Stream<Item = Result<T, E>>`.
///
/// `Ok` items become data signals, the first `Err` becomes an error signal,
/// and exhaustion becomes a single end signal after which the source
/// reports `None`. While paused the inner stream is not polled at all.
pub struct StreamSource<S> {
    inner: Fuse<S>,
    flow: FlowHandle,
    gate: watch::Receiver<bool>,
    data_event: Cow<'static, str>,
    end_event: Cow<'static, str>,
    error_event: Cow<'static, str>,
    ended: bool,
}

impl<S: Stream> StreamSource<S> {
    pub fn new(stream: S) -> Self {
        let flow = FlowHandle::new();
        let gate = flow.subscribe();
        Self {
            inner: stream.fuse(),
            flow,
            gate,
            data_event: Cow::Borrowed("data"),
            end_event: Cow::Borrowed("end"),
            error_event: Cow::Borrowed("error"),
            ended: false,
        }
    }

    /// Emit signals under custom names instead of `data`/`end`/`error`
    pub fn with_events(
        mut self,
        data: impl Into<Cow<'static, str>>,
        end: impl Into<Cow<'static, str>>,
        error: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.data_event = data.into();
        self.end_event = end.into();
        self.error_event = error.into();
        self
    }

    pub fn flow_handle(&self) -> FlowHandle {
        self.flow.clone()
    }

    pub fn is_paused(&self) -> bool {
        self.flow.is_paused()
    }

    pub fn pause_count(&self) -> u64 {
        self.flow.pause_count()
    }

    pub fn resume_count(&self) -> u64 {
        self.flow.resume_count()
    }
}

impl<S> FlowControl for StreamSource<S> {
    fn pause(&self) {
        self.flow.pause()
    }

    fn resume(&self) {
        self.flow.resume()
    }
}

#[async_trait]
impl<S, T, E> SignalSource for StreamSource<S>
where
    S: Stream<Item = Result<T, E>> + Unpin + Send,
    T: Send,
    E: Into<BoxError>,
{
    type Item = T;

    async fn next_signal(&mut self) -> Option<Signal<T>> {
        if self.ended {
            return None;
        }

        let resumed = self.gate.wait_for(|paused| !*paused).await.is_ok();
        if !resumed {
            return None;
        }

        let signal = match self.inner.next().await {
            Some(Ok(item)) => Signal::new(self.data_event.clone(), Payload::Item(item)),
            Some(Err(error)) => Signal::new(self.error_event.clone(), Payload::Error(error.into())),
            None => {
                self.ended = true;
                Signal::new(self.end_event.clone(), Payload::Empty)
            }
        };
        Some(signal)
    }
}
