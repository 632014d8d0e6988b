//! Tests for the tokio runtime adapter

use std::time::Duration;

use task_throttler::core::{Spawn, Timer};
use task_throttler::TokioRuntime;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tokio_runtime_spawn() {
    let runtime = TokioRuntime::new(tokio::runtime::Handle::current());

    let (tx, rx) = tokio::sync::oneshot::channel();
    runtime.spawn(async move {
        tx.send(123).unwrap();
    });

    let result = rx.await.expect("oneshot result");
    assert_eq!(result, 123);
}

#[tokio::test(start_paused = true)]
async fn test_tokio_runtime_sleep() {
    let runtime = TokioRuntime::current();
    let start = tokio::time::Instant::now();

    runtime.sleep(Duration::from_millis(1500)).await;

    assert!(start.elapsed() >= Duration::from_millis(1500));
}

#[test]
fn test_try_current_outside_runtime() {
    assert!(TokioRuntime::try_current().is_none());
}
