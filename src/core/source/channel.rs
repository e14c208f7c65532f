//! Channel-backed signal source
//!
//! [`channel`] returns an [`Emitter`] for producers and a [`ChannelSource`]
//! for the collector. Pausing the source closes a gate that emitters wait on
//! before sending data and end signals, so producers are held back for as
//! long as a batch is being handled. Error signals bypass the gate.

use super::{FlowControl, Payload, Signal, SignalSource};
use crate::utils::error::BoxError;
use async_trait::async_trait;
use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::error::SendError;
use tokio::sync::{mpsc, watch};
use tracing::trace;

/// Shared pause state behind a source
#[derive(Debug)]
struct PauseGate {
    paused: watch::Sender<bool>,
    pauses: AtomicU64,
    resumes: AtomicU64,
}

/// Cloneable flow-control handle for a source.
///
/// Usable as an upstream controller when the collector observes one source
/// but must throttle another.
#[derive(Debug, Clone)]
pub struct FlowHandle {
    gate: Arc<PauseGate>,
}

impl FlowHandle {
    pub(crate) fn new() -> Self {
        let (paused, _) = watch::channel(false);
        Self {
            gate: Arc::new(PauseGate {
                paused,
                pauses: AtomicU64::new(0),
                resumes: AtomicU64::new(0),
            }),
        }
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<bool> {
        self.gate.paused.subscribe()
    }

    pub fn is_paused(&self) -> bool {
        *self.gate.paused.borrow()
    }

    /// Number of pause commands received so far
    pub fn pause_count(&self) -> u64 {
        self.gate.pauses.load(Ordering::SeqCst)
    }

    /// Number of resume commands received so far
    pub fn resume_count(&self) -> u64 {
        self.gate.resumes.load(Ordering::SeqCst)
    }
}

impl Default for FlowHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowControl for FlowHandle {
    fn pause(&self) {
        self.gate.pauses.fetch_add(1, Ordering::SeqCst);
        self.gate.paused.send_replace(true);
        trace!("source paused");
    }

    fn resume(&self) {
        self.gate.resumes.fetch_add(1, Ordering::SeqCst);
        self.gate.paused.send_replace(false);
        trace!("source resumed");
    }
}

/// Create a bounded signal channel.
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn channel<T>(capacity: usize) -> (Emitter<T>, ChannelSource<T>) {
    let (tx, rx) = mpsc::channel(capacity);
    let flow = FlowHandle::new();
    let emitter = Emitter {
        tx,
        gate: flow.subscribe(),
    };
    (emitter, ChannelSource { rx, flow })
}

/// Producer side of [`channel`]
#[derive(Debug)]
pub struct Emitter<T> {
    tx: mpsc::Sender<Signal<T>>,
    gate: watch::Receiver<bool>,
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            gate: self.gate.clone(),
        }
    }
}

impl<T> Emitter<T> {
    /// Send a signal, waiting first for the source to be resumed if it is paused
    pub async fn emit(&self, signal: Signal<T>) -> Result<(), SendError<Signal<T>>> {
        let mut gate = self.gate.clone();
        let open = gate.wait_for(|paused| !*paused).await.is_ok();
        if !open {
            return Err(SendError(signal));
        }
        self.tx.send(signal).await
    }

    /// Send a signal without waiting for a paused source to be resumed.
    ///
    /// Meant for failure signals, which must reach the collector even while
    /// it is handling a batch.
    pub async fn emit_now(&self, signal: Signal<T>) -> Result<(), SendError<Signal<T>>> {
        self.tx.send(signal).await
    }

    /// Send a payload under a custom signal name
    pub async fn emit_as(
        &self,
        event: impl Into<Cow<'static, str>>,
        payload: Payload<T>,
    ) -> Result<(), SendError<Signal<T>>> {
        self.emit(Signal::new(event, payload)).await
    }

    pub async fn data(&self, item: T) -> Result<(), SendError<Signal<T>>> {
        self.emit(Signal::data(item)).await
    }

    pub async fn end(&self) -> Result<(), SendError<Signal<T>>> {
        self.emit(Signal::end()).await
    }

    /// Send an error signal; never held back by a pause
    pub async fn error(&self, error: impl Into<BoxError>) -> Result<(), SendError<Signal<T>>> {
        self.emit_now(Signal::error(error)).await
    }

    /// Whether the emitter is currently held back by a paused source
    pub fn is_paused(&self) -> bool {
        *self.gate.borrow()
    }

    /// Whether the receiving source has been dropped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side of [`channel`]
#[derive(Debug)]
pub struct ChannelSource<T> {
    rx: mpsc::Receiver<Signal<T>>,
    flow: FlowHandle,
}

impl<T> ChannelSource<T> {
    /// Handle observing (and able to drive) this source's pause state
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

impl<T> FlowControl for ChannelSource<T> {
    fn pause(&self) {
        self.flow.pause()
    }

    fn resume(&self) {
        self.flow.resume()
    }
}

#[async_trait]
impl<T: Send> SignalSource for ChannelSource<T> {
    type Item = T;

    async fn next_signal(&mut self) -> Option<Signal<T>> {
        self.rx.recv().await
    }
}
