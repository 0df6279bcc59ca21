use crate::{
    AdapterError, AlwaysLive, Builders, Callbacks, ExecutionStatus, Liveness, NoopRenderHost,
    ProducerId, RenderHost, RenderSink, RetryTrigger, StreamFactory, ViewNode,
};
use futures_signals::signal::{Mutable, MutableSignalCloned, Signal, SignalExt, SignalStream};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Options that are not builders or callbacks.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct AdapterOptions {
    /// Start the first execution on mount. Ignored (treated as `true`) when no
    /// idle builder is configured, since nothing could start it otherwise.
    pub auto_start: bool,
}

impl Default for AdapterOptions {
    fn default() -> Self {
        Self { auto_start: true }
    }
}

struct Shared<C, N, T, E> {
    factory: Box<dyn StreamFactory<T, E>>,
    builders: Builders<C, N, T, E>,
    callbacks: Callbacks<T, E>,
    liveness: Box<dyn Liveness>,
    render_host: Box<dyn RenderHost>,
    options: AdapterOptions,
    status: Mutable<ExecutionStatus<T, E>>,
    // status is only written while this lock is held
    current: Mutex<Option<ProducerId>>,
    next_id: AtomicU64,
    mounted: AtomicBool,
    // cancelled only while `current` is held
    unmounted: CancellationToken,
    // runtime seen at mount or first start; used when started from a foreign thread
    runtime: OnceLock<Handle>,
}

impl<C, N, T, E> Shared<C, N, T, E> {
    fn lock_current(&self) -> MutexGuard<'_, Option<ProducerId>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn unmount(&self) {
        let _current = self.lock_current();
        self.unmounted.cancel();
    }

    fn remember_runtime(&self) -> Option<Handle> {
        match Handle::try_current() {
            Ok(handle) => {
                let _ = self.runtime.set(handle.clone());
                Some(handle)
            }
            Err(_) => self.runtime.get().cloned(),
        }
    }
}

impl<C, N, T, E> Shared<C, N, T, E>
where
    C: 'static,
    N: 'static,
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn is_live(&self) -> bool {
        !self.unmounted.is_cancelled() && self.liveness.is_live()
    }

    fn retry_trigger(self: &Arc<Self>) -> RetryTrigger {
        let weak: Weak<Self> = Arc::downgrade(self);
        RetryTrigger::new(move || match weak.upgrade() {
            Some(shared) => {
                if let Err(error) = shared.start() {
                    warn!(reason = error.as_label(), "retry ignored: {}", error);
                }
            }
            None => debug!("retry ignored: adapter dropped"),
        })
    }

    fn start(self: &Arc<Self>) -> Result<(), AdapterError> {
        if self.unmounted.is_cancelled() {
            return Err(AdapterError::Unmounted);
        }
        let runtime = self.remember_runtime().ok_or(AdapterError::NoRuntime)?;

        let producer = self.factory.produce();
        let id = ProducerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        {
            let mut current = self.lock_current();
            *current = Some(id);
            self.status.set(ExecutionStatus::Pending);
        }
        debug!(producer = id.get(), "start: status pending");
        self.render_host.request_render();

        // weak: a pending producer never keeps a dropped adapter alive
        let weak = Arc::downgrade(self);
        let unmounted = self.unmounted.clone();
        runtime.spawn(async move {
            let outcome = tokio::select! {
                biased;
                _ = unmounted.cancelled() => {
                    debug!(producer = id.get(), "unmounted before settlement");
                    return;
                }
                outcome = producer => outcome,
            };
            if let Some(shared) = weak.upgrade() {
                shared.on_settled(id, outcome);
            }
        });
        Ok(())
    }

    /// Returns whether the settlement was applied.
    fn on_settled(self: &Arc<Self>, id: ProducerId, outcome: Result<T, E>) -> bool {
        {
            let current = self.lock_current();
            if self.unmounted.is_cancelled() {
                debug!(producer = id.get(), "settled after unmount, dropped");
                return false;
            }
            if *current != Some(id) {
                debug!(producer = id.get(), "settled after supersession, dropped");
                return false;
            }
            self.status.set(ExecutionStatus::from(outcome.clone()));
        }
        debug!(producer = id.get(), ok = outcome.is_ok(), "settled");

        // callbacks run unlocked, so they may fire a retry
        if self.is_live() {
            match outcome {
                Ok(value) => {
                    if let Some(on_data) = &self.callbacks.on_data {
                        on_data(value);
                    }
                }
                Err(error) => {
                    if let Some(on_error) = &self.callbacks.on_error {
                        on_error(error, self.retry_trigger());
                    }
                }
            }
        } else {
            debug!(producer = id.get(), "host not live, delivery suppressed");
        }

        self.render_host.request_render();
        true
    }
}

/// Drives one asynchronous producer and projects its status onto builders.
///
/// Build with [`StreamAdapter::builder`], then [`mount`](StreamAdapter::mount)
/// it. Dropping the adapter unmounts it.
///
/// ```no_run
/// use easeview::StreamAdapter;
///
/// # async fn example() {
/// let adapter = StreamAdapter::<(), String, u32, String>::builder(|| async {
///     Ok::<u32, String>(42)
/// })
///     .data(|_, value| format!("value: {value}"))
///     .build();
/// adapter.mount().unwrap();
/// let _node = adapter.render(&());
/// # }
/// ```
pub struct StreamAdapter<C, N, T, E> {
    shared: Arc<Shared<C, N, T, E>>,
}

impl<C, N, T, E> Drop for StreamAdapter<C, N, T, E> {
    fn drop(&mut self) {
        self.shared.unmount();
    }
}

impl<C, N, T, E> StreamAdapter<C, N, T, E>
where
    C: 'static,
    N: 'static,
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub fn builder<F>(factory: F) -> StreamAdapterBuilder<C, N, T, E>
    where
        F: StreamFactory<T, E>,
    {
        StreamAdapterBuilder::new(factory)
    }

    /// Attaches the adapter. The first call performs the implicit start unless
    /// auto-start is disabled and an idle builder can offer a manual trigger.
    /// Later calls do nothing.
    pub fn mount(&self) -> Result<(), AdapterError> {
        if self.shared.unmounted.is_cancelled() {
            return Err(AdapterError::Unmounted);
        }
        if self.shared.mounted.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        // retry triggers may later fire from threads outside the runtime
        self.shared.remember_runtime();
        if self.shared.options.auto_start || !self.shared.builders.has_idle() {
            debug!("mount: auto start");
            self.shared.start().inspect_err(|_| {
                self.shared.mounted.store(false, Ordering::Release);
            })
        } else {
            debug!("mount: waiting for manual start");
            Ok(())
        }
    }

    /// Detaches the adapter for good. A pending producer stops being awaited
    /// and nothing it does afterwards reaches the adapter.
    pub fn unmount(&self) {
        debug!("unmount");
        self.shared.unmount();
    }

    /// Starts a new execution, superseding the current one if any.
    pub fn start(&self) -> Result<(), AdapterError> {
        self.shared.start()
    }

    pub fn retry_trigger(&self) -> RetryTrigger {
        self.shared.retry_trigger()
    }

    pub fn status(&self) -> ExecutionStatus<T, E> {
        self.shared.status.get_cloned()
    }

    pub fn status_signal(&self) -> MutableSignalCloned<ExecutionStatus<T, E>> {
        self.shared.status.signal_cloned()
    }

    pub fn to_stream(&self) -> SignalStream<MutableSignalCloned<ExecutionStatus<T, E>>> {
        self.shared.status.signal_cloned().to_stream()
    }

    /// The producer backing the current or most recent execution.
    pub fn current_producer(&self) -> Option<ProducerId> {
        *self.shared.lock_current()
    }

    pub fn is_mounted(&self) -> bool {
        self.shared.mounted.load(Ordering::Acquire) && !self.shared.unmounted.is_cancelled()
    }

    /// Whether settlement callbacks would be delivered right now.
    pub fn is_live(&self) -> bool {
        self.shared.is_live()
    }

    /// Builds the node for the current status. Has no side effects.
    pub fn render(&self, ctx: &C) -> N
    where
        N: ViewNode,
    {
        let status = self.shared.status.get_cloned();
        self.shared
            .builders
            .select(ctx, &status, &self.shared.retry_trigger())
    }

    pub fn render_into<S>(&self, ctx: &C, sink: &S)
    where
        N: ViewNode,
        S: RenderSink<N>,
    {
        sink.present(self.render(ctx));
    }

    /// Rendered nodes, re-emitted each time the status changes.
    ///
    /// Intermediate statuses may be skipped when the consumer is slower than
    /// the producer; the latest one is always rendered.
    pub fn render_signal(&self, ctx: C) -> impl Signal<Item = N>
    where
        N: ViewNode,
    {
        let builders = self.shared.builders.clone();
        let retry = self.shared.retry_trigger();
        self.shared
            .status
            .signal_cloned()
            .map(move |status| builders.select(&ctx, &status, &retry))
    }
}

/// Collects the configuration of a [`StreamAdapter`].
pub struct StreamAdapterBuilder<C, N, T, E> {
    factory: Box<dyn StreamFactory<T, E>>,
    builders: Builders<C, N, T, E>,
    callbacks: Callbacks<T, E>,
    liveness: Box<dyn Liveness>,
    render_host: Box<dyn RenderHost>,
    options: AdapterOptions,
}

impl<C, N, T, E> StreamAdapterBuilder<C, N, T, E>
where
    C: 'static,
    N: 'static,
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub fn new<F>(factory: F) -> Self
    where
        F: StreamFactory<T, E>,
    {
        Self {
            factory: Box::new(factory),
            builders: Builders::new(),
            callbacks: Callbacks::new(),
            liveness: Box::new(AlwaysLive),
            render_host: Box::new(NoopRenderHost),
            options: AdapterOptions::default(),
        }
    }

    pub fn idle<F>(mut self, builder: F) -> Self
    where
        F: Fn(&C, RetryTrigger) -> N + Send + Sync + 'static,
    {
        self.builders = self.builders.idle(builder);
        self
    }

    pub fn busy<F>(mut self, builder: F) -> Self
    where
        F: Fn(&C) -> N + Send + Sync + 'static,
    {
        self.builders = self.builders.busy(builder);
        self
    }

    pub fn error<F>(mut self, builder: F) -> Self
    where
        F: Fn(&C, &E, RetryTrigger) -> N + Send + Sync + 'static,
    {
        self.builders = self.builders.error(builder);
        self
    }

    pub fn data<F>(mut self, builder: F) -> Self
    where
        F: Fn(&C, &T) -> N + Send + Sync + 'static,
    {
        self.builders = self.builders.data(builder);
        self
    }

    /// Replaces all four builders at once.
    pub fn builders(mut self, builders: Builders<C, N, T, E>) -> Self {
        self.builders = builders;
        self
    }

    pub fn on_data<F>(mut self, callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.callbacks = self.callbacks.on_data(callback);
        self
    }

    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(E, RetryTrigger) + Send + Sync + 'static,
    {
        self.callbacks = self.callbacks.on_error(callback);
        self
    }

    pub fn liveness<L>(mut self, liveness: L) -> Self
    where
        L: Liveness,
    {
        self.liveness = Box::new(liveness);
        self
    }

    pub fn render_host<H>(mut self, render_host: H) -> Self
    where
        H: RenderHost,
    {
        self.render_host = Box::new(render_host);
        self
    }

    pub fn options(mut self, options: AdapterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn auto_start(mut self, auto_start: bool) -> Self {
        self.options.auto_start = auto_start;
        self
    }

    /// The adapter starts out `NotStarted` and unmounted.
    pub fn build(self) -> StreamAdapter<C, N, T, E> {
        StreamAdapter {
            shared: Arc::new(Shared {
                factory: self.factory,
                builders: self.builders,
                callbacks: self.callbacks,
                liveness: self.liveness,
                render_host: self.render_host,
                options: self.options,
                status: Mutable::new(ExecutionStatus::NotStarted),
                current: Mutex::new(None),
                next_id: AtomicU64::new(0),
                mounted: AtomicBool::new(false),
                unmounted: CancellationToken::new(),
                runtime: OnceLock::new(),
            }),
        }
    }
}
