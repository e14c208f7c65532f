//! Batching collector
//!
//! Reads signals from a [`SignalSource`], buffers parsed items and hands every
//! `batch_size` of them to a [`BatchHandler`]. The source is paused for the
//! whole handler invocation and resumed only after the handler succeeds. At
//! most one handler invocation is ever in flight.
//!
//! While a handler runs the collector keeps listening to the source so an
//! error signal fails the run straight away. Data or end signals that the
//! source still delivers while paused are held back and replayed, in order,
//! after the resume.

mod state;


use crate::config::BatchOptions;
use crate::core::handler::{self, BatchHandler};
use crate::core::parser::{Identity, ItemParser};
use crate::core::source::{FlowControl, Payload, SharedFlowControl, Signal, SignalSource};
use crate::utils::error::{BatchError, Result};
use state::{RunState, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Collects signals into fixed-size batches, see the module docs
pub struct BatchCollector<P = Identity> {
    options: BatchOptions,
    parser: P,
    upstream: Option<SharedFlowControl>,
}

impl BatchCollector<Identity> {
    /// Create a collector with validated options and the identity parser
    pub fn new(options: BatchOptions) -> Result<Self> {
        let options = options.validated()?;
        Ok(Self {
            options,
            parser: Identity,
            upstream: None,
        })
    }
}

impl Default for BatchCollector<Identity> {
    fn default() -> Self {
        Self {
            options: BatchOptions::default(),
            parser: Identity,
            upstream: None,
        }
    }
}

impl<P> BatchCollector<P> {
    /// Replace the per-item parser
    pub fn with_parser<Q>(self, parser: Q) -> BatchCollector<Q> {
        BatchCollector {
            options: self.options,
            parser,
            upstream: self.upstream,
        }
    }

    /// Send pause/resume to `upstream` instead of the observed source
    pub fn with_upstream(mut self, upstream: SharedFlowControl) -> Self {
        self.upstream = Some(upstream);
        self
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Collect until the source ends, errors, or a handler fails.
    ///
    /// Resolves with the total number of items observed.
    pub async fn run<S, H>(&self, source: &mut S, handler: &mut H) -> Result<u64>
    where
        S: SignalSource,
        P: ItemParser<S::Item>,
        H: BatchHandler<P::Output> + ?Sized,
    {
        self.run_until_cancelled(source, handler, &CancellationToken::new())
            .await
    }

    /// Like [`BatchCollector::run`], but gives up with [`BatchError::Cancelled`]
    /// as soon as `cancel` fires. No resume is issued after cancellation.
    pub async fn run_until_cancelled<S, H>(
        &self,
        source: &mut S,
        handler: &mut H,
        cancel: &CancellationToken,
    ) -> Result<u64>
    where
        S: SignalSource,
        P: ItemParser<S::Item>,
        H: BatchHandler<P::Output> + ?Sized,
    {
        let batch_size = self.options.batch_size as u64;
        let mut state: RunState<S::Item, P::Output> = RunState::new(self.options.batch_size);
        debug!(batch_size, "collecting batches");

        loop {
            let signal = match state.deferred.pop_front() {
                Some(signal) => signal,
                None => {
                    self.next_signal(source, state.counter, state.source_open, cancel)
                        .await?
                }
            };

            match SignalKind::classify(&self.options, signal.event()) {
                SignalKind::Data => {
                    let item = match signal.payload {
                        Payload::Item(item) => item,
                        _ => {
                            return Err(BatchError::signal(
                                signal.event.into_owned(),
                                "expected an item payload",
                            ));
                        }
                    };
                    if state.push(self.parser.parse(item), batch_size) {
                        self.pause(source);
                        let batch = state.take_batch();
                        self.flush_paused(source, handler, batch, &mut state, cancel)
                            .await?;
                        self.resume(source);
                    }
                }
                SignalKind::End => {
                    let count = state.counter;
                    if !state.buffer.is_empty() {
                        let batch = state.take_batch();
                        self.flush_remainder(source, handler, batch, &mut state, cancel)
                            .await?;
                    }
                    info!(items = count, "stream ended");
                    return Ok(count);
                }
                SignalKind::Error => return Err(self.source_failure(signal, state.counter)),
                SignalKind::Other => {
                    trace!(event = %signal.event, "ignoring unrecognised signal");
                }
            }
        }
    }

    async fn next_signal<S>(
        &self,
        source: &mut S,
        count: u64,
        source_open: bool,
        cancel: &CancellationToken,
    ) -> Result<Signal<S::Item>>
    where
        S: SignalSource,
    {
        if !source_open {
            return Err(BatchError::source_closed(count, self.options.end_event.clone()));
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(BatchError::cancelled(count)),
            signal = source.next_signal() => signal.ok_or_else(|| {
                warn!(count, "source closed before its end signal");
                BatchError::source_closed(count, self.options.end_event.clone())
            }),
        }
    }

    /// Hand a full batch to the handler while the source is paused
    async fn flush_paused<S, H>(
        &self,
        source: &mut S,
        handler: &mut H,
        batch: Vec<P::Output>,
        state: &mut RunState<S::Item, P::Output>,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        S: SignalSource,
        P: ItemParser<S::Item>,
        H: BatchHandler<P::Output> + ?Sized,
    {
        let count = state.counter;
        debug!(count, size = batch.len(), "flushing batch");

        let call = handler::invoke(handler, batch, count);
        tokio::pin!(call);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(BatchError::cancelled(count)),
                outcome = &mut call => {
                    return outcome.map_err(|error| {
                        warn!(count, error = %error, "batch handler failed");
                        BatchError::handler(count, error)
                    });
                }
                signal = source.next_signal(), if state.source_open => match signal {
                    None => state.source_open = false,
                    Some(signal) => match SignalKind::classify(&self.options, signal.event()) {
                        SignalKind::Error => return Err(self.source_failure(signal, count)),
                        SignalKind::Other => {
                            trace!(event = %signal.event, "ignoring unrecognised signal");
                        }
                        SignalKind::Data | SignalKind::End => {
                            debug!(event = %signal.event, "signal delivered while paused, deferring");
                            state.deferred.push_back(signal);
                        }
                    },
                },
            }
        }
    }

    /// Hand the end-of-stream remainder to the handler.
    ///
    /// The source is not paused, but it is still watched: an error signal
    /// fails the run, anything else is ignored.
    async fn flush_remainder<S, H>(
        &self,
        source: &mut S,
        handler: &mut H,
        batch: Vec<P::Output>,
        state: &mut RunState<S::Item, P::Output>,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        S: SignalSource,
        P: ItemParser<S::Item>,
        H: BatchHandler<P::Output> + ?Sized,
    {
        let count = state.counter;
        debug!(count, size = batch.len(), "flushing remainder");

        let call = handler::invoke(handler, batch, count);
        tokio::pin!(call);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(BatchError::cancelled(count)),
                outcome = &mut call => {
                    return outcome.map_err(|error| {
                        warn!(count, error = %error, "batch handler failed on remainder");
                        BatchError::handler(count, error)
                    });
                }
                signal = source.next_signal(), if state.source_open => match signal {
                    None => state.source_open = false,
                    Some(signal) => match SignalKind::classify(&self.options, signal.event()) {
                        SignalKind::Error => return Err(self.source_failure(signal, count)),
                        _ => trace!(event = %signal.event, "ignoring signal after end"),
                    },
                },
            }
        }
    }

    fn source_failure<R>(&self, signal: Signal<R>, count: u64) -> BatchError {
        let error = match signal.payload {
            Payload::Error(error) => error,
            _ => format!("'{}' signal carried no error", signal.event).into(),
        };
        warn!(count, error = %error, "source failed");
        BatchError::source_error(count, error)
    }

    fn pause<S: FlowControl>(&self, source: &S) {
        match &self.upstream {
            Some(upstream) => upstream.pause(),
            None => source.pause(),
        }
        trace!("pause issued");
    }

    fn resume<S: FlowControl>(&self, source: &S) {
        match &self.upstream {
            Some(upstream) => upstream.resume(),
            None => source.resume(),
        }
        trace!("resume issued");
    }
}

/// Collect `source` into batches of `options.batch_size` items, passing each
/// batch to `handler` unchanged.
///
/// Resolves with the total item count once the source ends. To transform
/// items before they are buffered use [`stream_batch_with`].
pub async fn stream_batch<S, H>(source: &mut S, handler: &mut H, options: BatchOptions) -> Result<u64>
where
    S: SignalSource,
    H: BatchHandler<S::Item> + ?Sized,
{
    BatchCollector::new(options)?.run(source, handler).await
}

/// Like [`stream_batch`], but passes every item through `parser` before
/// buffering it.
pub async fn stream_batch_with<S, H, P>(
    source: &mut S,
    handler: &mut H,
    options: BatchOptions,
    parser: P,
) -> Result<u64>
where
    S: SignalSource,
    P: ItemParser<S::Item>,
    H: BatchHandler<P::Output> + ?Sized,
{
    BatchCollector::new(options)?
        .with_parser(parser)
        .run(source, handler)
        .await
}
