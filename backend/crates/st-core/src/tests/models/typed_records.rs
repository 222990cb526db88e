use crate::{
    BillingCycle, BillingRecord, CoreError, CreditCard, DeviceIdentity, Record, RecordType,
    Subscription, Tag,
};

use chrono::{SubsecRound, TimeZone, Utc};
use googletest::prelude::*;

fn sample_subscription(owner: DeviceIdentity) -> Subscription {
    Subscription::new(
        owner,
        "Music".to_string(),
        999,
        "USD".to_string(),
        BillingCycle::Monthly,
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
    )
}

#[test]
fn given_subscription_when_converted_to_record_and_back_then_fields_preserved() {
    let subscription = sample_subscription(DeviceIdentity::generate());

    let record = Record::from(subscription.clone());
    assert_that!(record.record_type, eq(RecordType::Subscription));
    assert_that!(record.parent_id, none());

    let restored = Subscription::try_from(record).unwrap();
    assert_that!(restored, eq(&subscription));
}

#[test]
fn given_billing_record_when_converted_then_parent_is_subscription() {
    let owner = DeviceIdentity::generate();
    let subscription = sample_subscription(owner);
    let mut bill = BillingRecord::new(
        owner,
        subscription.id,
        999,
        "USD".to_string(),
        Utc::now().trunc_subsecs(0),
    );
    bill.note = Some("first month".to_string());

    let record = Record::from(bill.clone());

    assert_that!(record.parent_id, some(eq(subscription.id)));
    assert_that!(record.validate(), ok(anything()));
    assert_that!(BillingRecord::try_from(record).unwrap(), eq(&bill));
}

#[test]
fn given_tag_record_when_converted_to_subscription_then_type_mismatch() {
    let record = Record::from(Tag::new(DeviceIdentity::generate(), "Work".to_string()));

    let result = Subscription::try_from(record);

    assert!(matches!(
        result,
        Err(CoreError::RecordTypeMismatch {
            expected: RecordType::Subscription,
            found: RecordType::Tag,
            ..
        })
    ));
}

#[test]
fn given_subscription_record_missing_amount_when_converted_then_validation_error() {
    let mut record = Record::from(sample_subscription(DeviceIdentity::generate()));
    record.remove_field("amount_minor");

    let result = Subscription::try_from(record);

    assert!(matches!(result, Err(CoreError::Validation { .. })));
}

#[test]
fn given_invalid_last_four_when_new_card_then_error() {
    let result = CreditCard::new(
        DeviceIdentity::generate(),
        "Visa".to_string(),
        "12a4".to_string(),
        4,
        2030,
    );

    assert_that!(result, err(anything()));
}

#[test]
fn given_card_linked_to_subscription_when_converted_then_round_trips() {
    let owner = DeviceIdentity::generate();
    let subscription = sample_subscription(owner);
    let mut card =
        CreditCard::new(owner, "Visa".to_string(), "4242".to_string(), 12, 2030).unwrap();
    card.subscription_id = Some(subscription.id);

    let restored = CreditCard::try_from(Record::from(card.clone())).unwrap();

    assert_that!(restored, eq(&card));
}

#[test]
fn given_subscription_with_card_and_tags_when_round_tripped_then_references_preserved() {
    let owner = DeviceIdentity::generate();
    let mut subscription = sample_subscription(owner);
    subscription.card_id = Some(uuid::Uuid::new_v4());
    subscription.tag_ids = vec![uuid::Uuid::new_v4(), uuid::Uuid::new_v4()];

    let record = Record::from(subscription.clone());
    assert_that!(record.field("tag_ids"), some(anything()));

    let restored = Subscription::try_from(record).unwrap();
    assert_that!(restored, eq(&subscription));
}

#[test]
fn given_malformed_tag_ids_when_converting_then_validation_error() {
    let record = Record::from(sample_subscription(DeviceIdentity::generate()))
        .with_field("tag_ids", "not-a-list");

    let result = Subscription::try_from(record);

    assert!(matches!(
        result,
        Err(CoreError::Validation { field: Some(ref f), .. }) if f == "tag_ids"
    ));
}
