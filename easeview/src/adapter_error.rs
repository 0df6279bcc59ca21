use thiserror::Error;

/// Errors raised by the adapter itself.
///
/// Producer failures are never reported here: they are opaque values recorded
/// in [`ExecutionStatus::Failed`](crate::ExecutionStatus::Failed) and rendered.
/// These variants only describe why a start could not happen at all.
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum AdapterError {
    /// `start` was called outside of a Tokio runtime, so settlement could not be awaited.
    #[error("no tokio runtime available to drive the producer")]
    NoRuntime,

    /// The adapter was unmounted; it no longer starts producers.
    #[error("adapter has been unmounted")]
    Unmounted,
}

impl AdapterError {
    /// Returns true if no runtime was available.
    pub fn is_no_runtime(&self) -> bool {
        matches!(self, AdapterError::NoRuntime)
    }

    /// Returns true if the adapter was already unmounted.
    pub fn is_unmounted(&self) -> bool {
        matches!(self, AdapterError::Unmounted)
    }

    /// Short snake_case label for log fields.
    pub fn as_label(&self) -> &'static str {
        match self {
            AdapterError::NoRuntime => "adapter_no_runtime",
            AdapterError::Unmounted => "adapter_unmounted",
        }
    }
}
