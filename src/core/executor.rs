//! Host runtime collaborators: task spawning and one-shot timers.
//!
//! The throttler does not own a clock or an executor. It drives everything
//! through these two traits so the same scheduler works on Tokio (see
//! [`crate::runtime::TokioRuntime`]) or any other runtime that can spawn
//! futures and sleep.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

/// Abstraction for spawning task execution on a runtime.
pub trait Spawn {
    /// Spawn a detached future that runs to completion.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Abstraction for the host timer service.
///
/// Pending sleeps are never cancelled by the throttler, so implementations do
/// not need cancellation support.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use task_throttler::core::Timer;
///
/// #[derive(Clone)]
/// struct AsyncStdTimer;
///
/// #[async_trait]
/// impl Timer for AsyncStdTimer {
///     async fn sleep(&self, duration: std::time::Duration) {
///         async_std::task::sleep(duration).await;
///     }
/// }
/// ```
#[async_trait]
pub trait Timer {
    /// Complete once `duration` has elapsed.
    async fn sleep(&self, duration: Duration);
}

/// A runtime able to both spawn futures and sleep; what a throttler needs.
pub trait ThrottleRuntime: Spawn + Timer + Clone + Send + Sync + 'static {}

impl<R> ThrottleRuntime for R where R: Spawn + Timer + Clone + Send + Sync + 'static {}
