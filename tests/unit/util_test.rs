//! Tests for utility functions

use task_throttler::util::init_tracing;

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing("task_throttler=debug");
    init_tracing("task_throttler=trace");
    tracing::debug!("tracing initialized twice without panicking");
}
