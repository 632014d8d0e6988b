//! Builders to construct throttlers from configuration.

use std::collections::HashMap;

use crate::config::{ThrottlerConfig, ThrottlerRegistryConfig};
use crate::core::{ThrottleError, ThrottleRuntime, Throttler};

/// Build a single throttler from configuration.
///
/// # Errors
///
/// Returns [`ThrottleError::InvalidRate`] when the configured rate is unusable.
pub fn build_throttler<T, E, R>(
    cfg: &ThrottlerConfig,
    runtime: R,
) -> Result<Throttler<T, E, R>, ThrottleError>
where
    T: Send + 'static,
    E: Clone + Send + 'static,
    R: ThrottleRuntime,
{
    Throttler::new(cfg, runtime)
}

/// Build every named throttler of a registry, sharing one runtime.
///
/// # Errors
///
/// Returns [`ThrottleError::InvalidConfig`] when the registry fails validation.
pub fn build_throttlers<T, E, R>(
    cfg: &ThrottlerRegistryConfig,
    runtime: &R,
) -> Result<HashMap<String, Throttler<T, E, R>>, ThrottleError>
where
    T: Send + 'static,
    E: Clone + Send + 'static,
    R: ThrottleRuntime,
{
    cfg.validate().map_err(ThrottleError::InvalidConfig)?;

    let mut throttlers = HashMap::with_capacity(cfg.throttlers.len());
    for (name, throttler_cfg) in &cfg.throttlers {
        let throttler = build_throttler(throttler_cfg, runtime.clone())?;
        tracing::info!(
            throttler = %name,
            rate = throttler_cfg.requests_per_second,
            "throttler built"
        );
        throttlers.insert(name.clone(), throttler);
    }

    Ok(throttlers)
}
