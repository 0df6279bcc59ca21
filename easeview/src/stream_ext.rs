use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use futures_core::stream::Stream;
use pin_project::pin_project;
use tracing::warn;

/// Adapters the crate's hosts and tests use on status and render streams.
pub trait EaseViewStreamExt: Stream {
    /// Yields items until one satisfies `done`, then ends. The satisfying
    /// item is yielded too.
    ///
    /// ```
    /// use easeview::{EaseViewStreamExt, ExecutionStatus};
    /// use futures_signals::signal::{Mutable, SignalExt};
    ///
    /// let status: Mutable<ExecutionStatus<u32, String>> = Mutable::new(ExecutionStatus::Pending);
    /// let _until_settled = status
    ///     .signal_cloned()
    ///     .to_stream()
    ///     .stop_if(|status| status.is_complete());
    /// ```
    fn stop_if<F>(self, done: F) -> StopIf<Self, F>
    where
        F: FnMut(&Self::Item) -> bool,
        Self: Sized,
    {
        StopIf {
            stream: self,
            done: Some(done),
        }
    }

    /// Turns the stream into a future that resolves with its first item.
    ///
    /// Everything after the first item is ignored and the stream is dropped
    /// together with the future. A stream that ends without yielding never
    /// resolves.
    fn first_outcome(self) -> FirstOutcome<Self>
    where
        Self: Sized,
    {
        FirstOutcome {
            stream: self,
            exhausted: false,
        }
    }
}
impl<T: ?Sized> EaseViewStreamExt for T where T: Stream {}

/// Stream returned by [`EaseViewStreamExt::stop_if`].
#[pin_project]
#[derive(Debug)]
#[must_use = "streams do nothing unless polled"]
pub struct StopIf<S, F> {
    #[pin]
    stream: S,
    // `None` once finished
    done: Option<F>,
}

impl<S, F> Stream for StopIf<S, F>
where
    S: Stream,
    F: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let Some(done) = this.done.as_mut() else {
            return Poll::Ready(None);
        };

        let item = ready!(this.stream.poll_next(cx));
        if item.as_ref().map_or(true, |item| done(item)) {
            *this.done = None;
        }
        Poll::Ready(item)
    }
}

/// Future resolving with the first item of a stream.
///
/// Created by the `first_outcome` method on `EaseViewStreamExt`.
#[pin_project(project = FirstOutcomeProj)]
#[derive(Debug)]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct FirstOutcome<S> {
    #[pin]
    stream: S,
    exhausted: bool,
}

impl<S> Future for FirstOutcome<S>
where
    S: Stream,
{
    type Output = S::Item;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let FirstOutcomeProj { stream, exhausted } = self.project();

        if *exhausted {
            return Poll::Pending;
        }

        match stream.poll_next(cx) {
            Poll::Ready(Some(item)) => Poll::Ready(item),
            Poll::Ready(None) => {
                // nothing will ever wake us again
                warn!("stream ended without producing an outcome; execution stays pending");
                *exhausted = true;
                Poll::Pending
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
