use crate::{AbortReason, MigrationResult, MigrationStatus, RecordType};

use uuid::Uuid;

#[test]
fn test_finish_without_failures_is_success() {
    let mut result = MigrationResult::started();
    result.counts_mut(RecordType::Subscription).copied = 3;
    result.counts_mut(RecordType::BillingRecord).copied = 5;

    let result = result.finish();

    assert_eq!(result.status, MigrationStatus::Success);
    assert_eq!(result.copied(), 8);
    assert_eq!(result.to_string(), "8 copied, 0 skipped, 0 failed");
}

#[test]
fn test_finish_with_failures_is_partial() {
    let mut result = MigrationResult::started();
    result.counts_mut(RecordType::Tag).copied = 1;
    result.record_failure(RecordType::Tag, Uuid::new_v4());

    let result = result.finish();

    assert_eq!(result.status, MigrationStatus::Partial);
    assert_eq!(result.failed(), 1);
    assert_eq!(result.failed_ids.len(), 1);
}

#[test]
fn test_abort_keeps_first_reason_and_survives_finish() {
    let mut result = MigrationResult::started();
    result.abort(AbortReason::Cancelled);
    result.abort(AbortReason::AlreadyRunning);

    let result = result.finish();

    assert_eq!(result.status, MigrationStatus::Aborted);
    assert_eq!(result.abort_reason, Some(AbortReason::Cancelled));
    assert!(result.to_string().ends_with("(aborted: cancelled)"));
}

#[test]
fn test_aborted_has_zero_counts() {
    let result = MigrationResult::aborted(AbortReason::Precondition {
        message: "cloud sync disabled".into(),
    });

    assert!(result.is_aborted());
    assert_eq!(result.totals().total(), 0);
}
