//! Runtime adapters for the host executor and timer.

pub mod tokio_runtime;

pub use tokio_runtime::{TokioRuntime, TokioThrottler};
