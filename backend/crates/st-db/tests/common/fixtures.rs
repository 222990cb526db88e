#![allow(dead_code)]

use st_core::{DeviceIdentity, Record, RecordType};

use uuid::Uuid;

pub fn create_test_subscription(owner: DeviceIdentity) -> Record {
    Record::new(RecordType::Subscription, owner)
        .with_field("name", "Streaming Plus")
        .with_field("amount_minor", 1299)
        .with_field("currency", "USD")
        .with_field("billing_cycle", "monthly")
        .with_field("next_due_at", "2026-11-01T00:00:00Z")
        .with_field("active", true)
}

pub fn create_test_billing_record(owner: DeviceIdentity, subscription_id: Uuid) -> Record {
    Record::new(RecordType::BillingRecord, owner)
        .with_parent(subscription_id)
        .with_field("amount_minor", 1299)
        .with_field("currency", "USD")
        .with_field("paid_at", "2026-10-01T00:00:00Z")
}

pub fn create_test_tag(owner: DeviceIdentity, name: &str) -> Record {
    Record::new(RecordType::Tag, owner).with_field("name", name)
}
