//! Pacing formulas for the two execution strategies.
//!
//! The throttler measures its budget in units of work per one-second window.
//! Sequential mode spaces single tasks `floor(1000 / rate)` ms apart (measured
//! from the previous task's completion). Parallel mode releases `floor(rate)`
//! tasks per 1000 ms window, or a single task per `floor(1000 / rate)` ms when
//! the rate is below one.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::ThrottleError;

/// Length of one pacing window in milliseconds.
pub const WINDOW_MS: u64 = 1000;

/// Execution strategy, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One task at a time, re-armed after each completion.
    Sequential,
    /// Up to `floor(rate)` tasks dispatched together per window.
    #[default]
    Parallel,
}

impl ExecutionMode {
    /// Select the mode from the `run_sequentially` flag.
    #[must_use]
    pub const fn from_run_sequentially(run_sequentially: bool) -> Self {
        if run_sequentially {
            Self::Sequential
        } else {
            Self::Parallel
        }
    }
}

/// Validated rate plus mode, from which batch size and re-arm delay derive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacing {
    rate: f64,
    mode: ExecutionMode,
}

impl Pacing {
    /// Create pacing for `rate` requests per second.
    ///
    /// # Errors
    ///
    /// Returns [`ThrottleError::InvalidRate`] for rates that are not finite
    /// or not strictly positive.
    pub fn new(rate: f64, mode: ExecutionMode) -> Result<Self, ThrottleError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ThrottleError::InvalidRate(rate));
        }
        Ok(Self { rate, mode })
    }

    /// Configured requests per second.
    #[must_use]
    pub const fn rate(&self) -> f64 {
        self.rate
    }

    /// Configured execution mode.
    #[must_use]
    pub const fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Maximum number of tasks dispatched per drain cycle.
    ///
    /// Fractional rates at or above one truncate, so 2.5 yields batches of 2.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn batch_size(&self) -> usize {
        match self.mode {
            ExecutionMode::Sequential => 1,
            ExecutionMode::Parallel if self.rate >= 1.0 => self.rate.floor() as usize,
            ExecutionMode::Parallel => 1,
        }
    }

    /// Delay between the end of one unit and the next drain attempt.
    #[must_use]
    pub fn delay(&self) -> Duration {
        match self.mode {
            ExecutionMode::Parallel if self.rate >= 1.0 => Duration::from_millis(WINDOW_MS),
            ExecutionMode::Sequential | ExecutionMode::Parallel => {
                Duration::from_millis(self.interval_ms())
            }
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn interval_ms(&self) -> u64 {
        (WINDOW_MS as f64 / self.rate).floor() as u64
    }
}
