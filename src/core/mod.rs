//! Core throttling abstractions: admission queue, pacing and execution strategies.

pub mod error;
pub mod executor;
pub mod pacing;
pub mod stats;
pub mod task;
pub mod throttler;

pub use error::{AppResult, TaskError, ThrottleError};
pub use executor::{Spawn, ThrottleRuntime, Timer};
pub use pacing::{ExecutionMode, Pacing, WINDOW_MS};
pub use stats::ThrottlerStats;
pub use task::{BatchHandle, TaskHandle, TaskId, TaskOutcome};
pub use throttler::{Phase, Throttler};
