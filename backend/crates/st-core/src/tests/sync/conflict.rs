use crate::{DeviceIdentity, Record, RecordType, Resolution, last_writer_wins};

use chrono::Duration;
use uuid::Uuid;

fn tag(owner: DeviceIdentity, name: &str) -> Record {
    Record::new(RecordType::Tag, owner).with_field("name", name)
}

#[test]
fn test_identical_copies_resolve_identical() {
    let record = tag(DeviceIdentity::generate(), "Work");

    assert_eq!(last_writer_wins(&record, &record.clone()), Resolution::Identical);
}

#[test]
fn test_newer_source_wins() {
    let destination = tag(DeviceIdentity::generate(), "Work");
    let mut source = destination.clone();
    source.set_field("name", "Office");

    assert_eq!(last_writer_wins(&source, &destination), Resolution::TakeSource);
    assert_eq!(
        last_writer_wins(&destination, &source),
        Resolution::KeepDestination
    );
}

#[test]
fn test_equal_timestamps_break_tie_on_owner() {
    let low = DeviceIdentity::from_uuid(Uuid::from_u128(1));
    let high = DeviceIdentity::from_uuid(Uuid::from_u128(2));
    let base = tag(low, "Work");
    let mut other = base.clone().with_field("name", "Office");
    other.owner = high;

    assert_eq!(last_writer_wins(&other, &base), Resolution::TakeSource);
    assert_eq!(last_writer_wins(&base, &other), Resolution::KeepDestination);
}

#[test]
fn test_older_source_keeps_destination() {
    let destination = tag(DeviceIdentity::generate(), "Work");
    let source = destination
        .clone()
        .with_field("name", "Old")
        .with_updated_at(destination.updated_at - Duration::seconds(5));

    assert_eq!(
        last_writer_wins(&source, &destination),
        Resolution::KeepDestination
    );
}
