//! Per-run bookkeeping

use crate::config::BatchOptions;
use crate::core::source::Signal;
use std::collections::VecDeque;

const MAX_PREALLOCATED: usize = 4096;

/// What a signal means to the collector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SignalKind {
    Data,
    End,
    Error,
    Other,
}

impl SignalKind {
    pub(crate) fn classify(options: &BatchOptions, event: &str) -> Self {
        if event == options.data_event {
            SignalKind::Data
        } else if event == options.end_event {
            SignalKind::End
        } else if event == options.error_event {
            SignalKind::Error
        } else {
            SignalKind::Other
        }
    }
}

/// Mutable state of one collector run
pub(crate) struct RunState<R, T> {
    /// Items observed since the run began; never reset
    pub(crate) counter: u64,
    /// Parsed items since the last flush
    pub(crate) buffer: Vec<T>,
    /// Data/end signals that arrived while the source was paused
    pub(crate) deferred: VecDeque<Signal<R>>,
    /// False once the source has reported that it will never produce again
    pub(crate) source_open: bool,
}

impl<R, T> RunState<R, T> {
    pub(crate) fn new(batch_size: usize) -> Self {
        Self {
            counter: 0,
            buffer: Vec::with_capacity(batch_size.min(MAX_PREALLOCATED)),
            deferred: VecDeque::new(),
            source_open: true,
        }
    }

    /// Record one parsed item; true when it completes a batch
    pub(crate) fn push(&mut self, item: T, batch_size: u64) -> bool {
        self.counter += 1;
        self.buffer.push(item);
        self.counter % batch_size == 0
    }

    /// Take the whole buffer, leaving it empty
    pub(crate) fn take_batch(&mut self) -> Vec<T> {
        std::mem::take(&mut self.buffer)
    }
}
