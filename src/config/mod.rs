//! Configuration models for throttlers.

pub mod throttler;

pub use throttler::{
    ThrottlerConfig, ThrottlerRegistryConfig, ENV_REQUESTS_PER_SECOND, ENV_RUN_SEQUENTIALLY,
};
