//! Tests for configuration validation

use std::collections::HashMap;

use task_throttler::config::{ThrottlerConfig, ThrottlerRegistryConfig};
use task_throttler::ExecutionMode;

#[test]
fn test_throttler_config_validation() {
    let valid = ThrottlerConfig::new(2.0);
    assert!(valid.validate().is_ok());
    assert_eq!(valid.mode(), ExecutionMode::Parallel);

    let sequential = ThrottlerConfig::new(0.3).with_run_sequentially(true);
    assert!(sequential.validate().is_ok());
    assert_eq!(sequential.mode(), ExecutionMode::Sequential);
}

#[test]
fn test_throttler_config_invalid_rate() {
    assert!(ThrottlerConfig::new(0.0).validate().is_err());
    assert!(ThrottlerConfig::new(-1.5).validate().is_err());
    assert!(ThrottlerConfig::new(f64::NAN).validate().is_err());
    assert!(ThrottlerConfig::new(f64::INFINITY).validate().is_err());
}

#[test]
fn test_throttler_config_from_json() {
    let config = ThrottlerConfig::from_json_str(r#"{ "requests_per_second": 0.5 }"#).unwrap();
    assert!((config.requests_per_second - 0.5).abs() < f64::EPSILON);
    assert!(!config.run_sequentially);

    let config = ThrottlerConfig::from_json_str(
        r#"{ "requests_per_second": 10, "run_sequentially": true }"#,
    )
    .unwrap();
    assert_eq!(config.mode(), ExecutionMode::Sequential);
}

#[test]
fn test_throttler_config_from_json_errors() {
    let err = ThrottlerConfig::from_json_str(r#"{ "run_sequentially": true }"#).unwrap_err();
    assert!(err.starts_with("parse error"));

    let err = ThrottlerConfig::from_json_str(r#"{ "requests_per_second": -3 }"#).unwrap_err();
    assert!(err.contains("invalid rate"));
}

#[test]
fn test_registry_config_validation() {
    let mut throttlers = HashMap::new();
    throttlers.insert("github".to_string(), ThrottlerConfig::new(10.0));
    throttlers.insert(
        "geocoder".to_string(),
        ThrottlerConfig::new(0.5).with_run_sequentially(true),
    );

    let config = ThrottlerRegistryConfig { throttlers };
    assert!(config.validate().is_ok());
}

#[test]
fn test_registry_config_empty() {
    let config = ThrottlerRegistryConfig::default();
    assert!(config.validate().is_err());
}

#[test]
fn test_registry_config_names_invalid_throttler() {
    let mut throttlers = HashMap::new();
    throttlers.insert("broken".to_string(), ThrottlerConfig::new(0.0));

    let err = ThrottlerRegistryConfig { throttlers }.validate().unwrap_err();
    assert!(err.contains("throttler `broken` invalid"));
}

#[test]
fn test_registry_config_from_json() {
    let json = r#"{
        "throttlers": {
            "github": { "requests_per_second": 10 },
            "geocoder": { "requests_per_second": 0.5, "run_sequentially": true }
        }
    }"#;

    let config = ThrottlerRegistryConfig::from_json_str(json).unwrap();
    assert_eq!(config.throttlers.len(), 2);
    assert_eq!(
        config.throttlers["geocoder"].mode(),
        ExecutionMode::Sequential
    );
}
