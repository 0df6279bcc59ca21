//! # EaseView
//!
//! Binds the lifecycle of one asynchronous producer to a set of declarative
//! view builders.
//!
//! A [`StreamAdapter`] starts a producer from its [`StreamFactory`], tracks
//! the [`ExecutionStatus`] of that execution, and renders it through
//! [`Builders`]: idle, busy, error or data. Restarting through a
//! [`RetryTrigger`] supersedes the previous producer; its late settlement is
//! ignored. Side-effect callbacks fire only while the host reports
//! [`Liveness`].

mod adapter_error;
mod builders;
mod execution_status;
mod host;
mod producer;
mod stream_adapter;
mod stream_ext;
pub mod mock;

pub use adapter_error::*;
pub use builders::*;
pub use execution_status::*;
pub use host::*;
pub use producer::*;
pub use stream_adapter::*;
pub use stream_ext::*;

#[cfg(test)]
mod unit_tests;
