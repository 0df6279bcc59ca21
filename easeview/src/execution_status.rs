#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lifecycle of one execution of a producer, as seen by the view layer.
///
/// Exactly one variant holds at a time. `NotStarted` is only observed before
/// the first start; every later start goes straight to `Pending`.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExecutionStatus<T, E> {
    NotStarted,
    Pending,
    Succeeded { value: T },
    Failed { error: E },
}

impl<T, E> ExecutionStatus<T, E> {
    pub fn is_not_started(&self) -> bool {
        matches!(self, ExecutionStatus::NotStarted)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ExecutionStatus::Pending)
    }

    /// True once the current execution has settled either way.
    pub fn is_complete(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::Succeeded { .. } | ExecutionStatus::Failed { .. }
        )
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, ExecutionStatus::Succeeded { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ExecutionStatus::Failed { .. })
    }

    /// True when a retry UI makes sense: nothing ran yet, or the last run failed.
    pub fn should_start(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::NotStarted | ExecutionStatus::Failed { .. }
        )
    }

    pub fn value_ref(&self) -> Option<&T> {
        match self {
            ExecutionStatus::Succeeded { value } => Some(value),
            _ => None,
        }
    }

    pub fn error_ref(&self) -> Option<&E> {
        match self {
            ExecutionStatus::Failed { error } => Some(error),
            _ => None,
        }
    }

    pub fn value(self) -> Option<T> {
        match self {
            ExecutionStatus::Succeeded { value } => Some(value),
            _ => None,
        }
    }

    pub fn error(self) -> Option<E> {
        match self {
            ExecutionStatus::Failed { error } => Some(error),
            _ => None,
        }
    }

    pub fn succeeded(value: T) -> Self {
        ExecutionStatus::Succeeded { value }
    }

    pub fn failed(error: E) -> Self {
        ExecutionStatus::Failed { error }
    }
}

impl<T, E> Default for ExecutionStatus<T, E> {
    fn default() -> Self {
        ExecutionStatus::NotStarted
    }
}

impl<T, E> From<Result<T, E>> for ExecutionStatus<T, E> {
    fn from(outcome: Result<T, E>) -> Self {
        match outcome {
            Ok(value) => ExecutionStatus::Succeeded { value },
            Err(error) => ExecutionStatus::Failed { error },
        }
    }
}
