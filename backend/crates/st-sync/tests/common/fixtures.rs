use st_core::{DeviceIdentity, Record, RecordType, now_millis};
use st_sync::{ReconcilerSettings, RetryPolicy};

use std::time::Duration;

use chrono::Duration as ChronoDuration;

pub fn test_settings() -> ReconcilerSettings {
    ReconcilerSettings {
        max_workers: 4,
        record_timeout: Duration::from_secs(2),
        retry: RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            backoff_multiplier: 2.0,
            jitter: false,
        },
        cloud_enabled: true,
    }
}

pub fn subscription(owner: DeviceIdentity, name: &str) -> Record {
    Record::new(RecordType::Subscription, owner)
        .with_field("name", name)
        .with_field("amount_minor", 999)
        .with_field("currency", "EUR")
        .with_field("billing_cycle", "monthly")
        .with_field("next_due_at", "2026-11-15T00:00:00Z")
        .with_field("active", true)
}

pub fn billing_record(owner: DeviceIdentity, subscription_id: uuid::Uuid, amount: i64) -> Record {
    Record::new(RecordType::BillingRecord, owner)
        .with_parent(subscription_id)
        .with_field("amount_minor", amount)
        .with_field("currency", "EUR")
        .with_field("paid_at", "2026-10-15T00:00:00Z")
}

pub fn tag(owner: DeviceIdentity, name: &str) -> Record {
    Record::new(RecordType::Tag, owner).with_field("name", name)
}

/// `subscriptions` subscriptions and `bills` billing records spread over
/// them round-robin. Timestamps are distinct so ordering is deterministic.
pub fn subscription_dataset(owner: DeviceIdentity, subscriptions: usize, bills: usize) -> Vec<Record> {
    let base = now_millis();
    let subs: Vec<Record> = (0..subscriptions)
        .map(|i| {
            subscription(owner, &format!("sub-{i}"))
                .with_updated_at(base + ChronoDuration::milliseconds(i as i64))
        })
        .collect();

    let billing: Vec<Record> = (0..bills)
        .map(|i| {
            billing_record(owner, subs[i % subs.len()].id, 100 + i as i64)
                .with_updated_at(base + ChronoDuration::milliseconds(i as i64))
        })
        .collect();

    subs.into_iter().chain(billing).collect()
}
