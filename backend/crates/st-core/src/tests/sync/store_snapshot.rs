use crate::{DeviceIdentity, Record, RecordType, StoreSnapshot};

use chrono::Duration;

#[test]
fn test_from_records_groups_in_migration_order() {
    let owner = DeviceIdentity::generate();
    let subscription = Record::new(RecordType::Subscription, owner);
    let tag = Record::new(RecordType::Tag, owner);
    let bill = Record::new(RecordType::BillingRecord, owner).with_parent(subscription.id);

    let snapshot = StoreSnapshot::from_records(vec![tag.clone(), bill.clone(), subscription.clone()]);

    let order: Vec<RecordType> = snapshot.iter().map(|r| r.record_type).collect();
    assert_eq!(
        order,
        vec![RecordType::Subscription, RecordType::BillingRecord, RecordType::Tag]
    );
    assert_eq!(snapshot.len(), 3);
    assert!(snapshot.records(RecordType::CreditCard).is_empty());
    assert_eq!(snapshot.get(bill.id), Some(&bill));
}

#[test]
fn test_group_sorted_by_updated_at() {
    let owner = DeviceIdentity::generate();
    let newer = Record::new(RecordType::Tag, owner);
    let older = Record::new(RecordType::Tag, owner)
        .with_updated_at(newer.updated_at - Duration::seconds(10));

    let snapshot = StoreSnapshot::from_records(vec![newer.clone(), older.clone()]);

    assert_eq!(snapshot.records(RecordType::Tag), &[older, newer]);
}

#[test]
fn test_extend_merges_groups() {
    let owner = DeviceIdentity::generate();
    let mut snapshot = StoreSnapshot::from_records(vec![Record::new(RecordType::Tag, owner)]);
    let other = StoreSnapshot::from_records(vec![
        Record::new(RecordType::Tag, owner),
        Record::new(RecordType::Subscription, owner),
    ]);

    snapshot.extend(other);

    assert_eq!(snapshot.records(RecordType::Tag).len(), 2);
    assert_eq!(snapshot.records(RecordType::Subscription).len(), 1);
    assert!(snapshot.taken_at.is_some());
}

#[test]
fn test_default_snapshot_is_empty() {
    let snapshot = StoreSnapshot::default();

    assert!(snapshot.is_empty());
    assert!(snapshot.taken_at.is_none());
}
