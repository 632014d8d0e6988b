//! Sequential mode: one task at a time, failures stay with their own task.
//!
//! The rate and mode come from `THROTTLER_REQUESTS_PER_SECOND` and
//! `THROTTLER_RUN_SEQUENTIALLY` (a `.env` file works too), defaulting to two
//! sequential requests per second.

use std::time::Instant;

use futures::future;
use task_throttler::core::AppResult;
use task_throttler::util::init_tracing;
use task_throttler::{TaskError, ThrottlerConfig, TokioRuntime, TokioThrottler};

#[tokio::main]
async fn main() -> AppResult<()> {
    init_tracing("task_throttler=debug");

    let config = ThrottlerConfig::from_env()
        .unwrap_or_else(|_| ThrottlerConfig::new(2.0).with_run_sequentially(true));
    println!("config: {config:?}");

    let throttler: TokioThrottler<u32, String> =
        TokioThrottler::new(&config, TokioRuntime::current())?;

    let started = Instant::now();
    let handles = throttler.enqueue_all((1..=6_u32).map(|i| {
        move || async move {
            if i % 3 == 0 {
                Err(format!("request {i} rejected upstream"))
            } else {
                Ok(i * i)
            }
        }
    }));

    let outcomes = future::join_all(handles).await;
    let elapsed = started.elapsed().as_millis();
    for (i, outcome) in outcomes.iter().enumerate() {
        match outcome {
            Ok(value) => println!("[{elapsed:>5} ms] task {i}: {value}"),
            Err(err) => match err.as_failed() {
                Some(reason) => println!("[{elapsed:>5} ms] task {i} failed: {reason}"),
                None => println!("[{elapsed:>5} ms] task {i}: {err}"),
            },
        }
    }

    let rejected: Vec<String> = outcomes
        .into_iter()
        .filter_map(|outcome| outcome.err().and_then(TaskError::into_failed))
        .collect();
    println!("rejected upstream: {rejected:?}");

    Ok(())
}
