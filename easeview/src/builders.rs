use crate::ExecutionStatus;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Node type produced by builders.
///
/// The adapter needs two nodes it can build without any builder: a neutral
/// empty placeholder, and a default indeterminate progress indicator.
pub trait ViewNode {
    fn empty() -> Self;

    fn progress_indicator() -> Self;
}

impl ViewNode for String {
    fn empty() -> Self {
        String::new()
    }

    fn progress_indicator() -> Self {
        String::from("loading...")
    }
}

/// Handle that restarts the execution of the adapter that issued it.
///
/// Cheap to clone. Firing it after the adapter is gone does nothing.
#[derive(Clone)]
pub struct RetryTrigger {
    start: Arc<dyn Fn() + Send + Sync>,
}

impl RetryTrigger {
    pub fn new<F>(start: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            start: Arc::new(start),
        }
    }

    /// A trigger that does nothing.
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    pub fn fire(&self) {
        (self.start)()
    }
}

impl fmt::Debug for RetryTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryTrigger").finish_non_exhaustive()
    }
}

pub type IdleBuilder<C, N> = Arc<dyn Fn(&C, RetryTrigger) -> N + Send + Sync>;
pub type BusyBuilder<C, N> = Arc<dyn Fn(&C) -> N + Send + Sync>;
pub type ErrorBuilder<C, N, E> = Arc<dyn Fn(&C, &E, RetryTrigger) -> N + Send + Sync>;
pub type DataBuilder<C, N, T> = Arc<dyn Fn(&C, &T) -> N + Send + Sync>;

/// One optional builder per status.
///
/// `C` is the host's render context, `N` the node type.
pub struct Builders<C, N, T, E> {
    idle: Option<IdleBuilder<C, N>>,
    busy: Option<BusyBuilder<C, N>>,
    error: Option<ErrorBuilder<C, N, E>>,
    data: Option<DataBuilder<C, N, T>>,
}

impl<C, N, T, E> Builders<C, N, T, E> {
    pub fn new() -> Self {
        Self {
            idle: None,
            busy: None,
            error: None,
            data: None,
        }
    }

    pub fn idle<F>(mut self, builder: F) -> Self
    where
        F: Fn(&C, RetryTrigger) -> N + Send + Sync + 'static,
    {
        self.idle = Some(Arc::new(builder));
        self
    }

    pub fn busy<F>(mut self, builder: F) -> Self
    where
        F: Fn(&C) -> N + Send + Sync + 'static,
    {
        self.busy = Some(Arc::new(builder));
        self
    }

    pub fn error<F>(mut self, builder: F) -> Self
    where
        F: Fn(&C, &E, RetryTrigger) -> N + Send + Sync + 'static,
    {
        self.error = Some(Arc::new(builder));
        self
    }

    pub fn data<F>(mut self, builder: F) -> Self
    where
        F: Fn(&C, &T) -> N + Send + Sync + 'static,
    {
        self.data = Some(Arc::new(builder));
        self
    }

    pub fn has_idle(&self) -> bool {
        self.idle.is_some()
    }

    /// Picks and runs the builder for `status`.
    ///
    /// Terminal statuses fall back from their own builder to the idle builder
    /// and then to the empty placeholder, in that order.
    pub fn select(&self, ctx: &C, status: &ExecutionStatus<T, E>, retry: &RetryTrigger) -> N
    where
        N: ViewNode,
    {
        match status {
            ExecutionStatus::NotStarted => {
                trace!("render: not started");
                self.idle_or_empty(ctx, retry)
            }
            ExecutionStatus::Pending => {
                trace!("render: pending");
                match &self.busy {
                    Some(busy) => busy(ctx),
                    None => N::progress_indicator(),
                }
            }
            ExecutionStatus::Failed { error } => {
                trace!("render: failed");
                match &self.error {
                    Some(build) => build(ctx, error, retry.clone()),
                    None => self.idle_or_empty(ctx, retry),
                }
            }
            ExecutionStatus::Succeeded { value } => {
                trace!("render: succeeded");
                match &self.data {
                    Some(build) => build(ctx, value),
                    None => self.idle_or_empty(ctx, retry),
                }
            }
        }
    }

    fn idle_or_empty(&self, ctx: &C, retry: &RetryTrigger) -> N
    where
        N: ViewNode,
    {
        match &self.idle {
            Some(idle) => idle(ctx, retry.clone()),
            None => N::empty(),
        }
    }
}

impl<C, N, T, E> Default for Builders<C, N, T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, N, T, E> Clone for Builders<C, N, T, E> {
    fn clone(&self) -> Self {
        Self {
            idle: self.idle.clone(),
            busy: self.busy.clone(),
            error: self.error.clone(),
            data: self.data.clone(),
        }
    }
}

pub type DataCallback<T> = Arc<dyn Fn(T) + Send + Sync>;
pub type ErrorCallback<E> = Arc<dyn Fn(E, RetryTrigger) + Send + Sync>;

/// Side effects fired once per settled execution, while the host is live.
pub struct Callbacks<T, E> {
    pub(crate) on_data: Option<DataCallback<T>>,
    pub(crate) on_error: Option<ErrorCallback<E>>,
}

impl<T, E> Callbacks<T, E> {
    pub fn new() -> Self {
        Self {
            on_data: None,
            on_error: None,
        }
    }

    pub fn on_data<F>(mut self, callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.on_data = Some(Arc::new(callback));
        self
    }

    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(E, RetryTrigger) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(callback));
        self
    }
}

impl<T, E> Default for Callbacks<T, E> {
    fn default() -> Self {
        Self::new()
    }
}
