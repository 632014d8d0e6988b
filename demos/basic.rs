//! One request per second: single submissions and an aggregate over a few.
//!
//! Run with `RUST_LOG=task_throttler=debug cargo run --example basic` to watch
//! the scheduler re-arm between windows.

use std::time::Duration;

use anyhow::Context;
use futures::future;
use task_throttler::core::AppResult;
use task_throttler::util::init_tracing;
use task_throttler::{ThrottlerConfig, TokioRuntime, TokioThrottler};

async fn fake_request(i: u32) -> Result<u32, String> {
    tokio::time::sleep(Duration::from_millis(10)).await;
    println!("request {i} answered");
    Ok(i)
}

#[tokio::main]
async fn main() -> AppResult<()> {
    init_tracing("info");

    let runtime =
        TokioRuntime::try_current().context("demo must run inside a tokio runtime")?;
    let throttler: TokioThrottler<u32, String> =
        TokioThrottler::new(&ThrottlerConfig::new(1.0), runtime)?;

    let looped: Vec<_> = (1..=5)
        .map(|i| throttler.submit(move || fake_request(i)))
        .collect();

    let one = throttler.submit(|| fake_request(101));
    let two = throttler.submit(|| fake_request(102));
    let three = throttler.submit(|| fake_request(103));

    for handle in looped {
        let i = handle.await?;
        println!("task {i} done");
    }
    let (one, two, three) = future::try_join3(one, two, three).await?;
    println!("tasks {one}, {two}, {three} done");

    let batch = throttler
        .submit_all((200..204).map(|i| move || fake_request(i)))
        .await?;
    println!("batch done: {batch:?}");
    println!("stats: {}", serde_json::to_string(&throttler.stats())?);

    Ok(())
}
