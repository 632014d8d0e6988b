//! Queued task descriptors and the handles returned to callers.

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use futures::future::{self, BoxFuture, TryJoinAll};
use futures::FutureExt;
use uuid::Uuid;

use crate::core::TaskError;

/// Identifier assigned to every submitted task, used in log fields.
pub type TaskId = Uuid;

/// Final outcome of a throttled task as seen by its caller.
pub type TaskOutcome<T, E> = Result<T, TaskError<E>>;

type Invoke<T, E> = Box<dyn FnOnce() -> BoxFuture<'static, Result<T, E>> + Send>;

/// One pending unit of work waiting in the throttler queue.
pub(crate) struct QueuedTask<T, E> {
    id: TaskId,
    invoke: Invoke<T, E>,
    settle: oneshot::Sender<TaskOutcome<T, E>>,
}

impl<T, E> QueuedTask<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Wrap a caller task and create the handle bound to it.
    pub(crate) fn new<F, Fut>(task: F) -> (Self, TaskHandle<T, E>)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let id = Uuid::new_v4();
        let (settle, rx) = oneshot::channel();
        let queued = Self {
            id,
            invoke: Box::new(move || task().boxed()),
            settle,
        };
        (queued, TaskHandle { id, rx })
    }

    /// Invoke the task, consuming the descriptor.
    ///
    /// Returns the settlement capability and a future yielding the task's
    /// outcome. A panic raised by the invocation itself or while polling the
    /// returned future becomes `TaskError::Panicked`.
    pub(crate) fn start(self) -> (Settle<T, E>, BoxFuture<'static, TaskOutcome<T, E>>) {
        let Self { id, invoke, settle } = self;
        let running = match panic::catch_unwind(AssertUnwindSafe(invoke)) {
            Ok(fut) => AssertUnwindSafe(fut)
                .catch_unwind()
                .map(move |caught| match caught {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(err)) => Err(TaskError::Failed(err)),
                    Err(payload) => Err(panicked(id, payload.as_ref())),
                })
                .boxed(),
            Err(payload) => future::ready(Err(panicked(id, payload.as_ref()))).boxed(),
        };
        (Settle { id, tx: settle }, running)
    }
}

fn panicked<E>(id: TaskId, payload: &(dyn Any + Send)) -> TaskError<E> {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    tracing::warn!(task_id = %id, %message, "task panicked");
    TaskError::Panicked(message)
}

/// Exactly-once settlement capability detached from a dequeued task.
pub(crate) struct Settle<T, E> {
    id: TaskId,
    tx: oneshot::Sender<TaskOutcome<T, E>>,
}

impl<T, E> Settle<T, E> {
    /// Deliver the outcome to the caller's handle.
    pub(crate) fn settle(self, outcome: TaskOutcome<T, E>) {
        if self.tx.send(outcome).is_err() {
            tracing::debug!(task_id = %self.id, "handle dropped before settlement");
        }
    }

    pub(crate) const fn id(&self) -> TaskId {
        self.id
    }
}

/// Future returned by [`crate::core::Throttler::submit`].
///
/// Resolves with the task's own value, or with a [`TaskError`] describing the
/// failure. Dropping the handle does not withdraw the task; it still runs when
/// its turn comes and its outcome is discarded.
#[must_use = "a task handle does nothing unless awaited"]
#[derive(Debug)]
pub struct TaskHandle<T, E> {
    id: TaskId,
    rx: oneshot::Receiver<TaskOutcome<T, E>>,
}

impl<T, E> TaskHandle<T, E> {
    /// Identifier of the task this handle settles for.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }
}

impl<T, E> Future for TaskHandle<T, E> {
    type Output = TaskOutcome<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(TaskError::Dropped)))
    }
}

/// Aggregate future returned by [`crate::core::Throttler::submit_all`].
///
/// Resolves with every value in submission order, or with the first failure
/// observed among its tasks.
pub type BatchHandle<T, E> = TryJoinAll<TaskHandle<T, E>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_resolves_value() {
        let (queued, handle) = QueuedTask::<u32, String>::new(|| async { Ok(7) });
        let (settle, running) = queued.start();
        assert_eq!(settle.id(), handle.id());
        settle.settle(running.await);
        assert_eq!(handle.await, Ok(7));
    }

    #[tokio::test]
    async fn test_start_captures_invoke_panic() {
        let (queued, handle) =
            QueuedTask::<u32, String>::new(|| -> future::Ready<Result<u32, String>> {
                panic!("sync boom")
            });
        let (settle, running) = queued.start();
        settle.settle(running.await);
        assert_eq!(
            handle.await,
            Err(TaskError::Panicked("sync boom".to_string()))
        );
    }

    #[tokio::test]
    async fn test_start_captures_poll_panic() {
        let (queued, handle) = QueuedTask::<u32, String>::new(|| async {
            let reason = String::from("async boom");
            if !reason.is_empty() {
                panic!("{reason}");
            }
            Ok(0)
        });
        let (settle, running) = queued.start();
        settle.settle(running.await);
        assert_eq!(
            handle.await,
            Err(TaskError::Panicked("async boom".to_string()))
        );
    }

    #[tokio::test]
    async fn test_dropped_task_yields_dropped() {
        let (queued, handle) = QueuedTask::<u32, String>::new(|| async { Ok(1) });
        drop(queued);
        assert_eq!(handle.await, Err(TaskError::Dropped));
    }
}
