//! Tests for error types

use task_throttler::core::{TaskError, ThrottleError};

#[test]
fn test_invalid_rate_error() {
    let err = ThrottleError::InvalidRate(0.0);
    assert_eq!(
        format!("{}", err),
        "invalid rate: 0 requests per second (must be finite and greater than 0)"
    );
}

#[test]
fn test_invalid_config_error() {
    let err = ThrottleError::InvalidConfig("at least one throttler must be defined".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: at least one throttler must be defined"
    );
}

#[test]
fn test_task_failed_error() {
    let err: TaskError<String> = TaskError::Failed("connection refused".to_string());
    assert_eq!(format!("{}", err), "task failed: connection refused");
}

#[test]
fn test_task_panicked_error() {
    let err: TaskError<String> = TaskError::Panicked("index out of bounds".to_string());
    assert_eq!(format!("{}", err), "task panicked: index out of bounds");
}

#[test]
fn test_task_dropped_error() {
    let err: TaskError<String> = TaskError::Dropped;
    assert_eq!(err.to_string(), "throttler dropped before the task settled");
}
