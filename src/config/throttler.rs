//! Throttler configuration structures.

use std::collections::HashMap;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::{AppResult, ExecutionMode, Pacing, ThrottleError};

/// Environment variable holding the requests-per-second budget.
pub const ENV_REQUESTS_PER_SECOND: &str = "THROTTLER_REQUESTS_PER_SECOND";
/// Environment variable selecting sequential execution.
pub const ENV_RUN_SEQUENTIALLY: &str = "THROTTLER_RUN_SEQUENTIALLY";

/// Configuration of a single throttler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThrottlerConfig {
    /// Maximum units of work per one-second window. May be below 1.
    pub requests_per_second: f64,
    /// Run one task at a time instead of in per-window batches.
    #[serde(default)]
    pub run_sequentially: bool,
}

impl ThrottlerConfig {
    /// Parallel-mode configuration with the given rate.
    #[must_use]
    pub const fn new(requests_per_second: f64) -> Self {
        Self {
            requests_per_second,
            run_sequentially: false,
        }
    }

    /// Select sequential or parallel execution.
    #[must_use]
    pub const fn with_run_sequentially(mut self, run_sequentially: bool) -> Self {
        self.run_sequentially = run_sequentially;
        self
    }

    /// Execution mode implied by `run_sequentially`.
    #[must_use]
    pub const fn mode(&self) -> ExecutionMode {
        ExecutionMode::from_run_sequentially(self.run_sequentially)
    }

    /// Derive pacing, rejecting unusable rates.
    ///
    /// # Errors
    ///
    /// Returns [`ThrottleError::InvalidRate`] for non-finite or non-positive rates.
    pub fn pacing(&self) -> Result<Pacing, ThrottleError> {
        Pacing::new(self.requests_per_second, self.mode())
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        self.pacing().map(|_| ()).map_err(|e| e.to_string())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a description of the parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from the process environment, reading a `.env`
    /// file first if one is present.
    ///
    /// # Errors
    ///
    /// Fails when the rate variable is missing or malformed, or the resulting
    /// configuration is invalid.
    pub fn from_env() -> AppResult<Self> {
        // A missing .env file is fine; real environment variables still apply.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ThrottlerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_rate = lookup(ENV_REQUESTS_PER_SECOND)
            .with_context(|| format!("{ENV_REQUESTS_PER_SECOND} is not set"))?;
        let requests_per_second = raw_rate
            .trim()
            .parse::<f64>()
            .with_context(|| format!("{ENV_REQUESTS_PER_SECOND} is not a number: {raw_rate:?}"))?;
        let run_sequentially = lookup(ENV_RUN_SEQUENTIALLY).map_or(Ok(false), |raw| {
            parse_flag(&raw)
                .with_context(|| format!("{ENV_RUN_SEQUENTIALLY} is not a boolean: {raw:?}"))
        })?;

        let cfg = Self {
            requests_per_second,
            run_sequentially,
        };
        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Named set of throttlers, e.g. one per upstream API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThrottlerRegistryConfig {
    /// Map of throttler name to configuration.
    pub throttlers: HashMap<String, ThrottlerConfig>,
}

impl ThrottlerRegistryConfig {
    /// Validate all throttlers and ensure at least one exists.
    ///
    /// # Errors
    ///
    /// Returns a description naming the first invalid throttler.
    pub fn validate(&self) -> Result<(), String> {
        if self.throttlers.is_empty() {
            return Err("at least one throttler must be defined".into());
        }
        for (name, throttler) in &self.throttlers {
            throttler
                .validate()
                .map_err(|e| format!("throttler `{name}` invalid: {e}"))?;
        }
        Ok(())
    }

    /// Parse registry configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a description of the parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
