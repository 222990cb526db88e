use crate::StoreError;

use uuid::Uuid;

#[test]
fn test_transient_errors_are_retryable() {
    assert!(StoreError::network_unavailable("offline").is_retryable());
    assert!(StoreError::timeout("insert").is_retryable());
    assert!(!StoreError::quota_exceeded("full").is_retryable());
    assert!(!StoreError::rejected("bad").is_retryable());
}

#[test]
fn test_fatal_errors_stop_run() {
    assert!(StoreError::quota_exceeded("full").is_fatal_to_run());
    assert!(StoreError::constraint_violation(Uuid::new_v4(), "differs").is_fatal_to_run());
    assert!(StoreError::persistence_unavailable("disk").is_fatal_to_run());
    assert!(!StoreError::network_unavailable("offline").is_fatal_to_run());
    assert!(!StoreError::decode("bad json").is_fatal_to_run());
}

#[test]
fn test_error_codes() {
    assert_eq!(
        StoreError::network_unavailable("x").error_code(),
        "NETWORK_UNAVAILABLE"
    );
    assert_eq!(
        StoreError::constraint_violation(Uuid::nil(), "x").error_code(),
        "CONSTRAINT_VIOLATION"
    );
}
