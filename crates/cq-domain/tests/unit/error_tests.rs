//! Unit tests for domain error types

use cq_domain::Error;
use std::sync::Arc;

#[test]
fn test_not_found_error() {
    let error = Error::not_found("factory");
    match error {
        Error::NotFound { resource } => assert_eq!(resource, "factory"),
        _ => panic!("Expected NotFound error"),
    }
}

#[test]
fn test_invalid_argument_error() {
    let error = Error::invalid_argument("bad id");
    assert!(error.is_invalid_argument());
    assert_eq!(error.to_string(), "Invalid argument: bad id");
}

#[test]
fn test_database_error_keeps_source() {
    let source = std::io::Error::other("connection reset");
    let error = Error::database_with_source("loading factories", source);

    assert!(error.is_database());
    let source = std::error::Error::source(&error).map(ToString::to_string);
    assert_eq!(source.as_deref(), Some("connection reset"));
}

#[test]
fn test_shared_error_is_transparent() {
    let shared = Arc::new(Error::database("store down"));
    let first = Error::from(Arc::clone(&shared));
    let second = Error::Shared(shared);

    assert!(first.is_database());
    assert!(!first.is_invalid_argument());
    assert_eq!(first.to_string(), "Database error: store down");
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn test_cache_and_configuration_errors() {
    assert_eq!(
        Error::cache("redis timeout").to_string(),
        "Cache error: redis timeout"
    );
    assert_eq!(
        Error::configuration("ttl must be positive").to_string(),
        "Configuration error: ttl must be positive"
    );
    assert!(!Error::cache("x").is_database());
}

#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: Error = json_err.into();
    assert!(matches!(error, Error::Json { .. }));
}
