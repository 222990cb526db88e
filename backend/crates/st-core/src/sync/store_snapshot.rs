use crate::{Record, RecordType, now_millis};

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Records held by one store at one instant, grouped by type.
///
/// Groups iterate in migration order; records inside a group are ordered by
/// `(updated_at, id)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub taken_at: Option<DateTime<Utc>>,
    groups: BTreeMap<RecordType, Vec<Record>>,
}

impl StoreSnapshot {
    pub fn new() -> Self {
        Self {
            taken_at: Some(now_millis()),
            groups: BTreeMap::new(),
        }
    }

    /// Builds a snapshot from records of any types, sorting each group.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut snapshot = Self::new();
        for record in records {
            snapshot
                .groups
                .entry(record.record_type)
                .or_default()
                .push(record);
        }
        for group in snapshot.groups.values_mut() {
            sort_group(group);
        }
        snapshot
    }

    /// Merges another snapshot into this one. Keeps the earliest `taken_at`.
    pub fn extend(&mut self, other: StoreSnapshot) {
        self.taken_at = match (self.taken_at, other.taken_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        for (record_type, records) in other.groups {
            let group = self.groups.entry(record_type).or_default();
            group.extend(records);
            sort_group(group);
        }
    }

    pub fn records(&self, record_type: RecordType) -> &[Record] {
        self.groups
            .get(&record_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All records, parents first.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.groups.values().flatten()
    }

    pub fn get(&self, id: Uuid) -> Option<&Record> {
        self.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn sort_group(group: &mut [Record]) {
    group.sort_by(|a, b| a.updated_at.cmp(&b.updated_at).then(a.id.cmp(&b.id)));
}
