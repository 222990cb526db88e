use crate::RecordType;

use std::str::FromStr;

#[test]
fn test_migration_order_puts_subscriptions_first() {
    assert_eq!(RecordType::MIGRATION_ORDER[0], RecordType::Subscription);

    let mut sorted = RecordType::MIGRATION_ORDER;
    sorted.sort();
    assert_eq!(sorted, RecordType::MIGRATION_ORDER);
}

#[test]
fn test_record_type_from_str() {
    for record_type in RecordType::MIGRATION_ORDER {
        assert_eq!(
            RecordType::from_str(record_type.as_str()).unwrap(),
            record_type
        );
    }
    assert!(RecordType::from_str("wish").is_err());
}

#[test]
fn test_record_type_references() {
    assert!(RecordType::BillingRecord.requires_parent());
    assert!(RecordType::CreditCard.references_subscription());
    assert!(!RecordType::CreditCard.requires_parent());
    assert!(!RecordType::Tag.references_subscription());
    assert!(!RecordType::Subscription.references_subscription());
}
