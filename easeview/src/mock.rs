//! Test doubles for driving an adapter by hand.

use crate::{BoxProducer, StreamFactory};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;

fn lock<A>(mutex: &Mutex<A>) -> MutexGuard<'_, A> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A factory whose producers only settle when the test says so.
///
/// Producers are numbered from 0 in creation order. Clones share the same
/// producers, so a test keeps one clone and hands another to the adapter.
pub struct ManualFactory<T, E> {
    settlers: Arc<Mutex<Vec<Option<oneshot::Sender<Result<T, E>>>>>>,
}

impl<T, E> ManualFactory<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    pub fn new() -> Self {
        Self {
            settlers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of producers created so far.
    pub fn produced(&self) -> usize {
        lock(&self.settlers).len()
    }

    /// Settles producer `index` with `value`.
    ///
    /// Returns false if no such producer exists, it already settled, or
    /// whoever awaited it has gone away.
    pub fn resolve(&self, index: usize, value: T) -> bool {
        self.settle(index, Ok(value))
    }

    /// Settles producer `index` with `error`. Same return value as [`resolve`](Self::resolve).
    pub fn reject(&self, index: usize, error: E) -> bool {
        self.settle(index, Err(error))
    }

    /// Settles the most recently created producer.
    pub fn resolve_latest(&self, value: T) -> bool {
        match self.produced().checked_sub(1) {
            Some(index) => self.resolve(index, value),
            None => false,
        }
    }

    pub fn settle(&self, index: usize, outcome: Result<T, E>) -> bool {
        let sender = lock(&self.settlers)
            .get_mut(index)
            .and_then(Option::take);
        match sender {
            Some(sender) => sender.send(outcome).is_ok(),
            None => false,
        }
    }
}

impl<T, E> Default for ManualFactory<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Clone for ManualFactory<T, E> {
    fn clone(&self) -> Self {
        Self {
            settlers: self.settlers.clone(),
        }
    }
}

impl<T, E> StreamFactory<T, E> for ManualFactory<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn produce(&self) -> BoxProducer<T, E> {
        let (tx, rx) = oneshot::channel();
        lock(&self.settlers).push(Some(tx));
        Box::pin(async move {
            match rx.await {
                Ok(outcome) => outcome,
                // settler dropped: this producer never settles
                Err(_) => std::future::pending().await,
            }
        })
    }
}

/// Records every call it sees, in order.
pub struct Recorder<A> {
    calls: Arc<Mutex<Vec<A>>>,
}

impl<A> Recorder<A> {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn record(&self, call: A) {
        lock(&self.calls).push(call);
    }

    pub fn len(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.calls).is_empty()
    }

    pub fn calls(&self) -> Vec<A>
    where
        A: Clone,
    {
        lock(&self.calls).clone()
    }
}

impl<A> Default for Recorder<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for Recorder<A> {
    fn clone(&self) -> Self {
        Self {
            calls: self.calls.clone(),
        }
    }
}
