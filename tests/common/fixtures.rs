//! Test fixtures: scripted sources and recording handlers

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use stream_batcher::{BatchHandler, BoxError, FlowControl, Signal, SignalSource};

/// Observable side effect of a collector run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    Pause,
    Resume,
    Batch { items: Vec<String>, total: u64 },
}

/// Shared, ordered record of [`FlowEvent`]s
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<FlowEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: FlowEvent) {
        self.events.lock().push(event);
    }

    pub fn events(&self) -> Vec<FlowEvent> {
        self.events.lock().clone()
    }

    pub fn batches(&self) -> Vec<(Vec<String>, u64)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                FlowEvent::Batch { items, total } => Some((items, total)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &FlowEvent) -> usize {
        self.events.lock().iter().filter(|e| *e == wanted).count()
    }
}

/// Source replaying a fixed list of signals.
///
/// While paused it never yields, like a well-behaved push source.
pub struct ScriptedSource<T> {
    script: VecDeque<Signal<T>>,
    paused: AtomicBool,
    log: EventLog,
}

impl<T> ScriptedSource<T> {
    pub fn new(script: Vec<Signal<T>>, log: EventLog) -> Self {
        Self {
            script: script.into(),
            paused: AtomicBool::new(false),
            log,
        }
    }

    /// Data signals for every value followed by an end signal
    pub fn items(values: Vec<T>, log: EventLog) -> Self {
        let mut script: Vec<Signal<T>> = values.into_iter().map(Signal::data).collect();
        script.push(Signal::end());
        Self::new(script, log)
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl<T> FlowControl for ScriptedSource<T> {
    fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
        self.log.push(FlowEvent::Pause);
    }

    fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
        self.log.push(FlowEvent::Resume);
    }
}

#[async_trait]
impl<T: Send> SignalSource for ScriptedSource<T> {
    type Item = T;

    async fn next_signal(&mut self) -> Option<Signal<T>> {
        if self.paused.load(Ordering::SeqCst) {
            futures::future::pending::<()>().await;
        }
        self.script.pop_front()
    }
}

/// Handler appending each batch to an [`EventLog`], optionally failing at given totals
pub struct LoggingHandler {
    log: EventLog,
    fail_at: Vec<u64>,
}

impl LoggingHandler {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            fail_at: Vec::new(),
        }
    }

    pub fn failing_at(mut self, total: u64) -> Self {
        self.fail_at.push(total);
        self
    }
}

#[async_trait]
impl<T: ToString + Send + 'static> BatchHandler<T> for LoggingHandler {
    async fn handle(&mut self, batch: Vec<T>, total: u64) -> Result<(), BoxError> {
        tokio::task::yield_now().await;
        if self.fail_at.contains(&total) {
            return Err(format!("refusing batch at {}", total).into());
        }
        self.log.push(FlowEvent::Batch {
            items: batch.iter().map(ToString::to_string).collect(),
            total,
        });
        Ok(())
    }
}
