//! Batch handlers
//!
//! A handler receives each flushed batch together with the number of items
//! observed so far. It runs while the source is paused.

use crate::utils::error::BoxError;
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// Asynchronous consumer of batches
#[async_trait]
pub trait BatchHandler<T: Send>: Send {
    /// Process one batch. `total` is the item count at the moment of the flush.
    async fn handle(&mut self, batch: Vec<T>, total: u64) -> Result<(), BoxError>;
}

/// Handler built from a closure, see [`handler_fn`]
#[derive(Debug, Clone)]
pub struct HandlerFn<F> {
    f: F,
}

/// Wrap an async closure `FnMut(Vec<T>, u64) -> impl Future<Output = Result<(), E>>` as a handler
pub fn handler_fn<F>(f: F) -> HandlerFn<F> {
    HandlerFn { f }
}

#[async_trait]
impl<T, F, Fut, E> BatchHandler<T> for HandlerFn<F>
where
    T: Send + 'static,
    F: FnMut(Vec<T>, u64) -> Fut + Send,
    Fut: Future<Output = Result<(), E>> + Send,
    E: Into<BoxError>,
{
    async fn handle(&mut self, batch: Vec<T>, total: u64) -> Result<(), BoxError> {
        (self.f)(batch, total).await.map_err(Into::into)
    }
}

/// Run one handler invocation, turning a panic into an ordinary error
pub(crate) async fn invoke<T, H>(handler: &mut H, batch: Vec<T>, total: u64) -> Result<(), BoxError>
where
    T: Send,
    H: BatchHandler<T> + ?Sized,
{
    match AssertUnwindSafe(handler.handle(batch, total))
        .catch_unwind()
        .await
    {
        Ok(outcome) => outcome,
        Err(panic) => Err(panic_message(panic).into()),
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("batch handler panicked: {}", message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("batch handler panicked: {}", message)
    } else {
        "batch handler panicked".to_string()
    }
}
