//! Capabilities borrowed from the host that mounts an adapter.
//!
//! The adapter never owns its host. It only asks two questions of it: is
//! delivery still meaningful ([`Liveness`]), and please paint again
//! ([`RenderHost`]). [`RenderSink`] is where a chosen node is handed off.

use futures_signals::signal::{Mutable, MutableSignal};
use std::fmt;
use tokio_util::sync::CancellationToken;

/// Whether the adapter is still attached to the visible tree and its screen is
/// in the foreground.
///
/// Must be callable at any time, and must return `false` once the host has
/// unmounted the adapter.
pub trait Liveness: Send + Sync + 'static {
    fn is_live(&self) -> bool;
}

impl<F> Liveness for F
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    fn is_live(&self) -> bool {
        self()
    }
}

/// Liveness for hosts without screens: always live while the adapter exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysLive;

impl Liveness for AlwaysLive {
    fn is_live(&self) -> bool {
        true
    }
}

/// Host-side liveness handle: a mount flag plus a foreground flag.
///
/// Clones share the same flags, so the host keeps one clone and passes another
/// to the adapter builder.
#[derive(Clone)]
pub struct HostLiveness {
    unmounted: CancellationToken,
    foreground: Mutable<bool>,
}

impl HostLiveness {
    /// Mounted and in the foreground.
    pub fn new() -> Self {
        Self {
            unmounted: CancellationToken::new(),
            foreground: Mutable::new(true),
        }
    }

    /// Permanent: a host never remounts the same handle.
    pub fn unmount(&self) {
        self.unmounted.cancel();
    }

    pub fn is_mounted(&self) -> bool {
        !self.unmounted.is_cancelled()
    }

    pub fn set_foreground(&self, foreground: bool) {
        self.foreground.set_neq(foreground);
    }

    pub fn is_foreground(&self) -> bool {
        self.foreground.get()
    }

    pub fn foreground_signal(&self) -> MutableSignal<bool> {
        self.foreground.signal()
    }

    /// Resolves once [`unmount`](Self::unmount) has been called.
    pub async fn unmounted(&self) {
        self.unmounted.cancelled().await
    }
}

impl fmt::Debug for HostLiveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostLiveness")
            .field("mounted", &self.is_mounted())
            .field("foreground", &self.is_foreground())
            .finish()
    }
}

impl Default for HostLiveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Liveness for HostLiveness {
    fn is_live(&self) -> bool {
        self.is_mounted() && self.is_foreground()
    }
}

/// Receives re-render requests. The host is expected to coalesce them.
pub trait RenderHost: Send + Sync + 'static {
    fn request_render(&self);
}

impl<F> RenderHost for F
where
    F: Fn() + Send + Sync + 'static,
{
    fn request_render(&self) {
        self()
    }
}

/// For hosts that pull renders from [`StreamAdapter::render_signal`](crate::StreamAdapter::render_signal).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderHost;

impl RenderHost for NoopRenderHost {
    fn request_render(&self) {}
}

/// Where a rendered node ends up. Assumed idempotent and cheap.
pub trait RenderSink<N> {
    fn present(&self, node: N);
}

impl<N, F> RenderSink<N> for F
where
    F: Fn(N),
{
    fn present(&self, node: N) {
        self(node)
    }
}
