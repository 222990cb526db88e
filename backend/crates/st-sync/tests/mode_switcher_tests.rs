mod common;

use common::{MemoryStore, subscription_dataset, tag, test_settings};

use st_core::{DeviceIdentity, MigrationStatus, StorageMode};
use st_sync::{MigrationCancel, ModeSwitch, ModeSwitcher, ReconcilerSettings};

use std::sync::Arc;

use googletest::prelude::*;

#[tokio::test]
async fn given_local_mode_when_switching_to_cloud_then_owned_records_pushed_and_committed() {
    // Given
    let identity = DeviceIdentity::generate();
    let stranger = DeviceIdentity::generate();
    let mut local_records = subscription_dataset(identity, 2, 3);
    local_records.push(tag(stranger, "imported"));
    let local = Arc::new(MemoryStore::seeded("local", local_records));
    let remote = Arc::new(MemoryStore::new("remote"));
    let switcher = ModeSwitcher::new(identity, local.clone(), remote.clone(), test_settings());

    // When
    let report = switcher
        .switch(StorageMode::Local, StorageMode::Cloud, &MigrationCancel::new())
        .await;

    // Then
    assert_that!(report.direction, eq(ModeSwitch::Push));
    assert_that!(report.result.status, eq(MigrationStatus::Success));
    assert_that!(report.result.copied(), eq(5));
    assert!(report.commit);
    assert_that!(remote.len(), eq(5));
}

#[tokio::test]
async fn given_cloud_mode_when_switching_to_local_then_all_remote_records_pulled() {
    // Given
    let identity = DeviceIdentity::generate();
    let other_device = DeviceIdentity::generate();
    let mut remote_records = subscription_dataset(identity, 1, 2);
    remote_records.extend(subscription_dataset(other_device, 1, 1));
    let local = Arc::new(MemoryStore::new("local"));
    let remote = Arc::new(MemoryStore::seeded("remote", remote_records));
    let switcher = ModeSwitcher::new(identity, local.clone(), remote.clone(), test_settings());

    // When
    let report = switcher
        .switch(StorageMode::Cloud, StorageMode::Local, &MigrationCancel::new())
        .await;

    // Then
    assert_that!(report.direction, eq(ModeSwitch::Pull));
    assert_that!(report.result.copied(), eq(5));
    assert!(report.commit);
    assert_that!(local.len(), eq(5));
}

#[tokio::test]
async fn given_same_mode_when_switching_then_noop_success() {
    // Given
    let identity = DeviceIdentity::generate();
    let local = Arc::new(MemoryStore::seeded("local", subscription_dataset(identity, 1, 1)));
    let remote = Arc::new(MemoryStore::new("remote"));
    let switcher = ModeSwitcher::new(identity, local.clone(), remote.clone(), test_settings());

    // When
    let report = switcher
        .switch(StorageMode::Local, StorageMode::Local, &MigrationCancel::new())
        .await;

    // Then
    assert_that!(report.direction, eq(ModeSwitch::Unchanged));
    assert_that!(report.result.status, eq(MigrationStatus::Success));
    assert_that!(report.result.totals().total(), eq(0));
    assert!(report.commit);
    assert_that!(remote.insert_calls(), eq(0));
}

#[tokio::test]
async fn given_cloud_disabled_when_switching_then_mode_not_committed() {
    // Given
    let identity = DeviceIdentity::generate();
    let local = Arc::new(MemoryStore::seeded("local", subscription_dataset(identity, 1, 1)));
    let remote = Arc::new(MemoryStore::new("remote"));
    let settings = ReconcilerSettings {
        cloud_enabled: false,
        ..test_settings()
    };
    let switcher = ModeSwitcher::new(identity, local, remote.clone(), settings);

    // When
    let report = switcher
        .switch(StorageMode::Local, StorageMode::Cloud, &MigrationCancel::new())
        .await;

    // Then
    assert_that!(report.result.status, eq(MigrationStatus::Aborted));
    assert!(!report.commit);
    assert_that!(remote.len(), eq(0));
}

#[tokio::test]
async fn given_local_records_when_planning_push_then_lists_owned_records() {
    // Given
    let identity = DeviceIdentity::generate();
    let local = Arc::new(MemoryStore::seeded("local", subscription_dataset(identity, 2, 2)));
    let remote = Arc::new(MemoryStore::new("remote"));
    let switcher = ModeSwitcher::new(identity, local, remote.clone(), test_settings());

    // When
    let plan = switcher
        .plan(StorageMode::Local, StorageMode::Cloud)
        .await
        .unwrap();

    // Then
    assert_that!(plan.to_copy.len(), eq(4));
    assert!(plan.conflicts.is_empty());
    assert_that!(remote.insert_calls(), eq(0));
}
