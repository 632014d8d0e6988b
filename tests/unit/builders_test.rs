//! Tests for builder modules

use std::collections::HashMap;

use task_throttler::builders::{build_throttler, build_throttlers};
use task_throttler::config::{ThrottlerConfig, ThrottlerRegistryConfig};
use task_throttler::core::ThrottleError;
use task_throttler::{ExecutionMode, Phase, TokioRuntime, TokioThrottler};

#[tokio::test]
async fn test_build_throttler() {
    let throttler: TokioThrottler<u32, String> = build_throttler(
        &ThrottlerConfig::new(4.0).with_run_sequentially(true),
        TokioRuntime::current(),
    )
    .unwrap();

    assert_eq!(throttler.mode(), ExecutionMode::Sequential);
    assert_eq!(throttler.pacing().batch_size(), 1);
    assert_eq!(throttler.phase(), Phase::Idle);
    assert_eq!(throttler.submit(|| async { Ok(5) }).await, Ok(5));
}

#[tokio::test]
async fn test_build_throttlers_from_registry() {
    let mut throttlers = HashMap::new();
    throttlers.insert("fast".to_string(), ThrottlerConfig::new(20.0));
    throttlers.insert(
        "slow".to_string(),
        ThrottlerConfig::new(0.25).with_run_sequentially(true),
    );
    let config = ThrottlerRegistryConfig { throttlers };

    let built: HashMap<String, TokioThrottler<u32, String>> =
        build_throttlers(&config, &TokioRuntime::current()).unwrap();

    assert_eq!(built.len(), 2);
    assert_eq!(built["fast"].pacing().batch_size(), 20);
    assert_eq!(built["slow"].mode(), ExecutionMode::Sequential);
    assert_eq!(built["fast"].submit(|| async { Ok(1) }).await, Ok(1));
}

#[tokio::test]
async fn test_build_throttlers_rejects_invalid_registry() {
    let registry = ThrottlerRegistryConfig::default();
    let result: Result<HashMap<String, TokioThrottler<u32, String>>, _> =
        build_throttlers(&registry, &TokioRuntime::current());

    assert!(matches!(result, Err(ThrottleError::InvalidConfig(_))));
}
