use crate::{DeviceIdentity, Record, RecordType};

use chrono::{Duration, Utc};
use googletest::prelude::*;
use serde_json::json;
use uuid::Uuid;

#[test]
fn given_new_record_when_set_field_then_timestamp_strictly_increases() {
    let mut record = Record::new(RecordType::Tag, DeviceIdentity::generate());
    let before = record.updated_at;

    record.set_field("name", "Streaming");

    assert_that!(record.updated_at, gt(before));
    assert_that!(record.field("name"), some(eq(&json!("Streaming"))));
}

#[test]
fn given_future_timestamp_when_touch_then_still_advances() {
    // Clock "behind" the record: touch must not go backwards.
    let future = Utc::now() + Duration::hours(1);
    let mut record =
        Record::new(RecordType::Tag, DeviceIdentity::generate()).with_updated_at(future);

    record.touch();
    record.touch();

    assert_that!(record.updated_at, eq(future + Duration::milliseconds(2)));
}

#[test]
fn given_missing_field_when_remove_field_then_timestamp_unchanged() {
    let mut record = Record::new(RecordType::Tag, DeviceIdentity::generate());
    let before = record.updated_at;

    let removed = record.remove_field("color");

    assert_that!(removed, none());
    assert_that!(record.updated_at, eq(before));
}

#[test]
fn given_sub_millisecond_difference_when_same_contents_then_true() {
    let record = Record::new(RecordType::Tag, DeviceIdentity::generate()).with_field("name", "a");
    let mut copy = record.clone();
    copy.updated_at += Duration::microseconds(300);

    assert!(record.same_contents(&copy));
}

#[test]
fn given_different_fields_when_same_contents_then_false() {
    let record = Record::new(RecordType::Tag, DeviceIdentity::generate()).with_field("name", "a");
    let other = record.clone().with_field("name", "b");

    assert!(!record.same_contents(&other));
}

#[test]
fn given_billing_record_without_parent_when_validate_then_error() {
    let record = Record::new(RecordType::BillingRecord, DeviceIdentity::generate());

    assert_that!(record.validate(), err(anything()));
}

#[test]
fn given_tag_with_parent_when_validate_then_error() {
    let record =
        Record::new(RecordType::Tag, DeviceIdentity::generate()).with_parent(Uuid::new_v4());

    assert_that!(record.validate(), err(anything()));
}

#[test]
fn given_card_without_parent_when_validate_then_ok() {
    let record = Record::new(RecordType::CreditCard, DeviceIdentity::generate());

    assert_that!(record.validate(), ok(anything()));
}

#[test]
fn given_self_reference_when_validate_then_error() {
    let record = Record::new(RecordType::BillingRecord, DeviceIdentity::generate());
    let id = record.id;
    let record = record.with_parent(id);

    assert_that!(record.validate(), err(anything()));
}

#[test]
fn given_record_json_without_parent_when_deserialize_then_parent_is_none() {
    let owner = DeviceIdentity::generate();
    let json = format!(
        r#"{{"id":"550e8400-e29b-41d4-a716-446655440000","record_type":"tag","owner":"{owner}","updated_at":"2024-01-01T00:00:00Z"}}"#
    );

    let record: Record = serde_json::from_str(&json).unwrap();

    assert_that!(record.parent_id, none());
    assert!(record.fields.is_empty());
    assert_that!(record.owner, eq(owner));
}
