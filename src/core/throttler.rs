//! The throttler: FIFO admission queue plus the pacing state machine.
//!
//! A throttler moves between three phases:
//!
//! - `Idle`: nothing executing and no timer pending. The next admission that
//!   is allowed to dequeue starts a drain cycle.
//! - `Draining`: one unit (a single task, or a parallel batch) is executing.
//! - `Armed`: the unit settled and a re-arm timer is pending. When it fires the
//!   drain either dispatches the next unit or finds the queue empty and goes
//!   back to `Idle`.
//!
//! Only the holder of the current phase transition drives progress, so there is
//! never more than one drain cycle in flight. Scheduler state sits behind a
//! `parking_lot::Mutex` that is never held while a task is invoked or awaited,
//! so `submit` may be called from any thread, including from inside a task.

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::channel::oneshot;
use futures::future::{self, BoxFuture};
use futures::FutureExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::config::ThrottlerConfig;
use crate::core::stats::ThrottlerCounters;
use crate::core::task::{QueuedTask, Settle, TaskId, TaskOutcome};
use crate::core::{
    BatchHandle, ExecutionMode, Pacing, TaskError, TaskHandle, ThrottleError, ThrottleRuntime,
    ThrottlerStats,
};

/// Scheduler phase of a throttler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No unit executing and no timer pending.
    Idle,
    /// A unit is executing.
    Draining,
    /// A re-arm timer is pending.
    Armed,
}

/// One drain cycle's worth of work taken off the queue.
enum Unit<T, E> {
    Single(QueuedTask<T, E>),
    Batch(Vec<QueuedTask<T, E>>),
}

struct State<T, E> {
    queue: VecDeque<QueuedTask<T, E>>,
    phase: Phase,
}

struct Inner<T, E, R> {
    pacing: Pacing,
    state: Mutex<State<T, E>>,
    counters: ThrottlerCounters,
    runtime: R,
}

/// Client-side rate limiter for asynchronous tasks.
///
/// Tasks are zero-argument closures returning a future of `Result<T, E>`.
/// They are queued in FIFO order and released at the configured rate, either
/// one at a time ([`ExecutionMode::Sequential`]) or in batches of
/// `floor(rate)` per second ([`ExecutionMode::Parallel`]).
///
/// Cloning a throttler yields another handle to the same queue.
///
/// ```rust,ignore
/// use task_throttler::{ThrottlerConfig, TokioRuntime, TokioThrottler};
///
/// let throttler: TokioThrottler<u32, String> =
///     TokioThrottler::new(&ThrottlerConfig::new(2.0), TokioRuntime::current())?;
///
/// let value = throttler.submit(|| async { Ok(42) }).await?;
/// let all = throttler
///     .submit_all((0..8).map(|i| move || async move { Ok(i) }))
///     .await?;
/// ```
pub struct Throttler<T, E, R> {
    inner: Arc<Inner<T, E, R>>,
}

impl<T, E, R> Clone for Throttler<T, E, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E, R> fmt::Debug for Throttler<T, E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (phase, queued) = {
            let state = self.inner.state.lock();
            (state.phase, state.queue.len())
        };
        f.debug_struct("Throttler")
            .field("pacing", &self.inner.pacing)
            .field("phase", &phase)
            .field("queued", &queued)
            .finish_non_exhaustive()
    }
}

impl<T, E, R> Throttler<T, E, R>
where
    T: Send + 'static,
    E: Clone + Send + 'static,
    R: ThrottleRuntime,
{
    /// Create a throttler from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ThrottleError::InvalidRate`] when `requests_per_second` is not
    /// finite or not strictly positive.
    pub fn new(config: &ThrottlerConfig, runtime: R) -> Result<Self, ThrottleError> {
        Ok(Self::with_pacing(config.pacing()?, runtime))
    }

    /// Create a throttler from already validated pacing.
    #[must_use]
    pub fn with_pacing(pacing: Pacing, runtime: R) -> Self {
        tracing::debug!(
            rate = pacing.rate(),
            mode = ?pacing.mode(),
            batch_size = pacing.batch_size(),
            "throttler created"
        );
        Self {
            inner: Arc::new(Inner {
                pacing,
                state: Mutex::new(State {
                    queue: VecDeque::new(),
                    phase: Phase::Idle,
                }),
                counters: ThrottlerCounters::default(),
                runtime,
            }),
        }
    }

    /// Queue a task and start draining if the throttler is idle.
    ///
    /// Never blocks; the returned handle settles with the task's own outcome.
    pub fn submit<F, Fut>(&self, task: F) -> TaskHandle<T, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        self.admit(task, true)
    }

    /// Queue several tasks and return one handle per task.
    ///
    /// In sequential mode every admission may start the drain chain. In
    /// parallel mode only the last one does, so the first batch is cut from
    /// the whole submission instead of from its first task.
    #[must_use]
    pub fn enqueue_all<I, F, Fut>(&self, tasks: I) -> Vec<TaskHandle<T, E>>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let sequential = self.mode() == ExecutionMode::Sequential;
        let mut tasks = tasks.into_iter().peekable();
        let mut handles = Vec::with_capacity(tasks.size_hint().0);
        while let Some(task) = tasks.next() {
            let last = tasks.peek().is_none();
            handles.push(self.admit(task, sequential || last));
        }
        handles
    }

    /// Queue several tasks and return a handle over all of them.
    ///
    /// The aggregate resolves with every value in submission order, or fails
    /// with the first failure observed. Individual tasks still run and settle
    /// regardless of the aggregate's outcome.
    pub fn submit_all<I, F, Fut>(&self, tasks: I) -> BatchHandle<T, E>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        future::try_join_all(self.enqueue_all(tasks))
    }

    fn admit<F, Fut>(&self, task: F, dequeue_immediately: bool) -> TaskHandle<T, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let (queued, handle) = QueuedTask::new(task);
        let depth = {
            let mut state = self.inner.state.lock();
            state.queue.push_back(queued);
            state.queue.len()
        };
        self.inner.counters.on_submit();
        tracing::debug!(task_id = %handle.id(), depth, "task enqueued");

        if dequeue_immediately {
            Inner::drain(&self.inner, Phase::Idle);
        }
        handle
    }
}

impl<T, E, R> Throttler<T, E, R> {
    /// Current scheduler phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.inner.state.lock().phase
    }

    /// Number of tasks waiting in the queue.
    #[must_use]
    pub fn queued_len(&self) -> usize {
        self.inner.state.lock().queue.len()
    }

    /// Pacing derived from the configured rate and mode.
    #[must_use]
    pub fn pacing(&self) -> Pacing {
        self.inner.pacing
    }

    /// Execution mode fixed at construction.
    #[must_use]
    pub fn mode(&self) -> ExecutionMode {
        self.inner.pacing.mode()
    }

    /// Snapshot of throttler statistics.
    #[must_use]
    pub fn stats(&self) -> ThrottlerStats {
        let queued = self.queued_len();
        self.inner.counters.snapshot(queued)
    }
}

impl<T, E, R> Inner<T, E, R>
where
    T: Send + 'static,
    E: Clone + Send + 'static,
    R: ThrottleRuntime,
{
    /// Run one drain decision if the throttler is still in phase `from`.
    ///
    /// Admissions drain from `Idle` and timers from `Armed`; any other phase
    /// means another cycle already owns progress and this call is a no-op.
    fn drain(inner: &Arc<Self>, from: Phase) {
        let unit = {
            let mut state = inner.state.lock();
            if state.phase != from {
                return;
            }
            if state.queue.is_empty() {
                state.phase = Phase::Idle;
                tracing::debug!("queue empty, throttler idle");
                return;
            }
            state.phase = Phase::Draining;
            match inner.pacing.mode() {
                ExecutionMode::Sequential => state.queue.pop_front().map(Unit::Single),
                ExecutionMode::Parallel => {
                    let take = inner.pacing.batch_size().min(state.queue.len());
                    Some(Unit::Batch(state.queue.drain(..take).collect()))
                }
            }
        };

        match unit {
            Some(Unit::Single(task)) => Self::execute_sequentially(inner, task),
            Some(Unit::Batch(batch)) => Self::execute_in_parallel(inner, batch),
            None => inner.set_phase(Phase::Idle),
        }
    }

    /// Run one task, settle it, then re-arm after `floor(1000 / rate)` ms.
    fn execute_sequentially(inner: &Arc<Self>, task: QueuedTask<T, E>) {
        let (settle, running) = task.start();
        inner.counters.on_dispatch(1);
        tracing::debug!(task_id = %settle.id(), "dispatching task");

        let this = Arc::clone(inner);
        inner.runtime.spawn(async move {
            let outcome = running.await;
            this.counters.on_settled(1, outcome.is_ok());
            settle.settle(outcome);
            Self::rearm(this).await;
        });
    }

    /// Run a batch concurrently; any failure rejects the whole batch with it.
    fn execute_in_parallel(inner: &Arc<Self>, batch: Vec<QueuedTask<T, E>>) {
        let size = batch.len();
        inner.counters.on_dispatch(size);
        tracing::debug!(batch_size = size, "dispatching batch");

        let (settles, pending): (Vec<Settle<T, E>>, Vec<_>) = batch
            .into_iter()
            .map(|task| {
                let (settle, running) = task.start();
                let pending = inner.detach(settle.id(), running);
                (settle, pending)
            })
            .unzip();

        let this = Arc::clone(inner);
        inner.runtime.spawn(async move {
            match future::try_join_all(pending).await {
                Ok(values) => {
                    this.counters.on_settled(size, true);
                    for (settle, value) in settles.into_iter().zip(values) {
                        settle.settle(Ok(value));
                    }
                }
                Err(err) => {
                    tracing::debug!(
                        batch_size = size,
                        "batch failed, rejecting every task in it"
                    );
                    this.counters.on_settled(size, false);
                    for settle in settles {
                        settle.settle(Err(err.clone()));
                    }
                }
            }
            Self::rearm(this).await;
        });
    }

    /// Spawn a dispatched task on its own so it runs to completion even if
    /// its batch has already failed.
    fn detach(
        &self,
        id: TaskId,
        running: BoxFuture<'static, TaskOutcome<T, E>>,
    ) -> impl Future<Output = TaskOutcome<T, E>> + Send + 'static {
        let (tx, rx) = oneshot::channel();
        self.runtime.spawn(async move {
            if tx.send(running.await).is_err() {
                tracing::debug!(task_id = %id, "batch already settled, discarding outcome");
            }
        });
        rx.map(|received| received.unwrap_or(Err(TaskError::Dropped)))
    }

    async fn rearm(inner: Arc<Self>) {
        let delay = inner.pacing.delay();
        inner.set_phase(Phase::Armed);
        tracing::debug!(delay = ?delay, "drain re-armed");
        inner.runtime.sleep(delay).await;
        Self::drain(&inner, Phase::Armed);
    }
}

impl<T, E, R> Inner<T, E, R> {
    fn set_phase(&self, phase: Phase) {
        self.state.lock().phase = phase;
    }
}
