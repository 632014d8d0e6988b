//! Error types for throttler construction and task settlement.

use thiserror::Error;

/// Errors produced while configuring or constructing a throttler.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThrottleError {
    /// The requests-per-second budget is zero, negative, or not finite.
    #[error("invalid rate: {0} requests per second (must be finite and greater than 0)")]
    InvalidRate(f64),
    /// Configuration failed validation or could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Failure outcome delivered to a task handle.
///
/// `Failed` carries the task's own error unchanged. In parallel mode every
/// handle of a failing batch receives a clone of the same `TaskError`, which is
/// why the parallel strategy requires `E: Clone`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError<E> {
    /// The task's future resolved to an error.
    #[error("task failed: {0}")]
    Failed(E),
    /// The task panicked while being invoked or polled.
    #[error("task panicked: {0}")]
    Panicked(String),
    /// The throttler was dropped while the task was still queued.
    #[error("throttler dropped before the task settled")]
    Dropped,
}

impl<E> TaskError<E> {
    /// Returns the task's own error, if this is a `Failed` outcome.
    #[must_use]
    pub fn into_failed(self) -> Option<E> {
        match self {
            Self::Failed(err) => Some(err),
            Self::Panicked(_) | Self::Dropped => None,
        }
    }

    /// Borrow the task's own error, if this is a `Failed` outcome.
    #[must_use]
    pub const fn as_failed(&self) -> Option<&E> {
        match self {
            Self::Failed(err) => Some(err),
            Self::Panicked(_) | Self::Dropped => None,
        }
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_accessors() {
        let err: TaskError<&str> = TaskError::Failed("boom");
        assert_eq!(err.as_failed(), Some(&"boom"));
        assert_eq!(err.into_failed(), Some("boom"));

        let panicked: TaskError<&str> = TaskError::Panicked("oops".into());
        assert!(panicked.as_failed().is_none());
        assert!(TaskError::<&str>::Dropped.into_failed().is_none());
    }
}
