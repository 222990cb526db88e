use st_core::{Record, RecordType, Resolution};

use serde::Serialize;
use uuid::Uuid;

/// Same id on both sides with different contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedConflict {
    pub id: Uuid,
    pub record_type: RecordType,
    /// Last-writer-wins verdict; the reconciler itself never overwrites.
    pub winner: Resolution,
}

/// Dry-run outcome: what a run would do right now.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconcilePlan {
    /// In-scope source records absent at the destination, parents first.
    pub to_copy: Vec<Record>,
    /// Ids already present at the destination with identical contents.
    pub present: Vec<Uuid>,
    pub conflicts: Vec<PlannedConflict>,
}

impl ReconcilePlan {
    pub fn is_noop(&self) -> bool {
        self.to_copy.is_empty() && self.conflicts.is_empty()
    }

    pub fn copy_count(&self, record_type: RecordType) -> usize {
        self.to_copy
            .iter()
            .filter(|r| r.record_type == record_type)
            .count()
    }
}
