use crate::Record;

use serde::Serialize;

/// Which copy of a record survives under last-writer-wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Identical,
    KeepDestination,
    TakeSource,
}

/// Record-level last-writer-wins between two copies of the same id.
///
/// Newer `updated_at` wins; equal timestamps fall back to the larger owner id,
/// then to the destination copy.
pub fn last_writer_wins(source: &Record, destination: &Record) -> Resolution {
    if source.same_contents(destination) {
        return Resolution::Identical;
    }

    let source_ts = source.updated_at.timestamp_millis();
    let destination_ts = destination.updated_at.timestamp_millis();

    match source_ts.cmp(&destination_ts) {
        std::cmp::Ordering::Greater => Resolution::TakeSource,
        std::cmp::Ordering::Less => Resolution::KeepDestination,
        std::cmp::Ordering::Equal if source.owner > destination.owner => Resolution::TakeSource,
        std::cmp::Ordering::Equal => Resolution::KeepDestination,
    }
}
