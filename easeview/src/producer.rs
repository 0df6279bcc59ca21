use crate::EaseViewStreamExt;
use futures_core::stream::Stream;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// One in-flight asynchronous operation. It settles at most once, with the
/// `Result` it resolves to.
pub type BoxProducer<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'static>>;

/// Creates a fresh, independent producer every time an execution is (re)started.
///
/// Any `Fn() -> impl Future<Output = Result<T, E>>` is a factory:
///
/// ```
/// use easeview::StreamFactory;
///
/// let factory = || async { Ok::<u32, String>(42) };
/// let _producer = factory.produce();
/// ```
pub trait StreamFactory<T, E>: Send + Sync + 'static {
    fn produce(&self) -> BoxProducer<T, E>;
}

impl<F, Fut, T, E> StreamFactory<T, E> for F
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    fn produce(&self) -> BoxProducer<T, E> {
        Box::pin(self())
    }
}

/// Factory over streams: each producer settles with the first item its stream yields.
///
/// Created by [`stream_factory`].
pub struct FromStreamFactory<F> {
    make_stream: F,
}

/// Adapts a factory of `Result` streams into a [`StreamFactory`].
///
/// Only the first item is observed. A stream that ends empty leaves the
/// execution pending.
pub fn stream_factory<F, S, T, E>(make_stream: F) -> FromStreamFactory<F>
where
    F: Fn() -> S + Send + Sync + 'static,
    S: Stream<Item = Result<T, E>> + Send + 'static,
{
    FromStreamFactory { make_stream }
}

impl<F, S, T, E> StreamFactory<T, E> for FromStreamFactory<F>
where
    F: Fn() -> S + Send + Sync + 'static,
    S: Stream<Item = Result<T, E>> + Send + 'static,
{
    fn produce(&self) -> BoxProducer<T, E> {
        Box::pin((self.make_stream)().first_outcome())
    }
}

/// Identity of one producer instance.
///
/// Ids grow monotonically per adapter, so a later start always carries a
/// different id than every producer it superseded.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ProducerId(pub(crate) u64);

impl ProducerId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProducerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "producer#{}", self.0)
    }
}
