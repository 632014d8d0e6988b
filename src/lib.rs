//! # Task Throttler
//!
//! A client-side rate limiter for asynchronous tasks.
//!
//! Callers hand the throttler zero-argument closures that start asynchronous
//! work. Tasks queue in strict FIFO order and are released at a configured
//! number of requests per second. Each caller gets a handle that settles with
//! exactly its own task's outcome.
//!
//! ## Execution Modes
//!
//! - **Parallel** (default): every 1000 ms window releases a batch of
//!   `floor(rate)` tasks that run concurrently. If any task in a batch fails,
//!   every handle in that batch is rejected with the same error. Rates below 1
//!   release a single task every `floor(1000 / rate)` ms.
//! - **Sequential**: one task at a time, with the next one released
//!   `floor(1000 / rate)` ms after the previous one settles. Failures only
//!   affect their own handle.
//!
//! ## Runtime Collaborators
//!
//! The throttler does not own a clock or an executor. It spawns work and
//! schedules re-arm timers through the [`core::Spawn`] and [`core::Timer`]
//! traits. [`runtime::TokioRuntime`] implements both for Tokio (feature
//! `tokio-runtime`, enabled by default).
//!
//! ```rust,ignore
//! use task_throttler::config::ThrottlerConfig;
//! use task_throttler::runtime::{TokioRuntime, TokioThrottler};
//!
//! let throttler: TokioThrottler<String, String> = TokioThrottler::new(
//!     &ThrottlerConfig::new(2.0),
//!     TokioRuntime::current(),
//! )?;
//!
//! // One task
//! let body = throttler.submit(|| fetch("https://example.com")).await?;
//!
//! // Eight tasks: two per second, all results in submission order
//! let pages = throttler
//!     .submit_all(urls.into_iter().map(|url| move || fetch(url)))
//!     .await?;
//! ```
//!
//! For complete examples, see:
//! - `tests/throttler_test.rs` - Pacing and settlement integration tests
//! - `demos/` - Runnable demos (`cargo run --example basic`)

#![deny(missing_docs)]
#![deny(warnings)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core throttling abstractions: queue, pacing and execution strategies.
pub mod core;
/// Configuration models for throttlers.
pub mod config;
/// Builders to construct throttlers from configuration.
pub mod builders;
/// Runtime adapters for the host executor and timer.
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
/// Shared utilities.
pub mod util;

pub use crate::config::ThrottlerConfig;
pub use crate::core::{
    BatchHandle, ExecutionMode, Phase, TaskError, TaskHandle, ThrottleError, Throttler,
    ThrottlerStats,
};
#[cfg(feature = "tokio-runtime")]
pub use crate::runtime::{TokioRuntime, TokioThrottler};
