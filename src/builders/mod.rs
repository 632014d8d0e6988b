//! Builders to construct throttlers from configuration.

pub mod throttler_builder;

pub use throttler_builder::{build_throttler, build_throttlers};
