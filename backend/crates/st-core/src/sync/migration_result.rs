use crate::{RecordType, now_millis};

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Terminal status of a reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationStatus {
    /// Every in-scope record is present at the destination.
    Success,
    /// Some records failed; safe to run again.
    Partial,
    /// Stopped early; see `abort_reason`.
    Aborted,
}

/// Lifecycle of a reconciler: `NotStarted -> Running -> {Success, Partial, Aborted}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationState {
    NotStarted,
    Running,
    Success,
    Partial,
    Aborted,
}

impl From<MigrationStatus> for MigrationState {
    fn from(status: MigrationStatus) -> Self {
        match status {
            MigrationStatus::Success => Self::Success,
            MigrationStatus::Partial => Self::Partial,
            MigrationStatus::Aborted => Self::Aborted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AbortReason {
    /// Destination unreachable or cloud mode not enabled. Nothing was written.
    Precondition { message: String },
    /// Identifier collision with different contents.
    Integrity { id: Uuid, message: String },
    QuotaExceeded { message: String },
    /// A store could not be read or written at all.
    Persistence { message: String },
    Cancelled,
    AlreadyRunning,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Precondition { message } => write!(f, "precondition failed: {message}"),
            Self::Integrity { id, message } => write!(f, "integrity error on {id}: {message}"),
            Self::QuotaExceeded { message } => write!(f, "remote quota exceeded: {message}"),
            Self::Persistence { message } => write!(f, "persistence unavailable: {message}"),
            Self::Cancelled => f.write_str("cancelled"),
            Self::AlreadyRunning => f.write_str("another run is in progress"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordCounts {
    pub copied: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RecordCounts {
    pub fn total(&self) -> usize {
        self.copied + self.skipped + self.failed
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrationResult {
    pub status: MigrationStatus,
    pub abort_reason: Option<AbortReason>,

    pub subscriptions: RecordCounts,
    pub billing_records: RecordCounts,
    pub credit_cards: RecordCounts,
    pub tags: RecordCounts,

    /// Records counted as failed, in the order they failed.
    pub failed_ids: Vec<Uuid>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl MigrationResult {
    pub fn started() -> Self {
        let now = now_millis();
        Self {
            status: MigrationStatus::Success,
            abort_reason: None,
            subscriptions: RecordCounts::default(),
            billing_records: RecordCounts::default(),
            credit_cards: RecordCounts::default(),
            tags: RecordCounts::default(),
            failed_ids: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    /// Aborted result with zero counts.
    pub fn aborted(reason: AbortReason) -> Self {
        let mut result = Self::started();
        result.abort(reason);
        result
    }

    pub fn counts(&self, record_type: RecordType) -> &RecordCounts {
        match record_type {
            RecordType::Subscription => &self.subscriptions,
            RecordType::BillingRecord => &self.billing_records,
            RecordType::CreditCard => &self.credit_cards,
            RecordType::Tag => &self.tags,
        }
    }

    pub fn counts_mut(&mut self, record_type: RecordType) -> &mut RecordCounts {
        match record_type {
            RecordType::Subscription => &mut self.subscriptions,
            RecordType::BillingRecord => &mut self.billing_records,
            RecordType::CreditCard => &mut self.credit_cards,
            RecordType::Tag => &mut self.tags,
        }
    }

    pub fn record_failure(&mut self, record_type: RecordType, id: Uuid) {
        self.counts_mut(record_type).failed += 1;
        self.failed_ids.push(id);
    }

    pub fn copied(&self) -> usize {
        self.totals().copied
    }

    pub fn skipped(&self) -> usize {
        self.totals().skipped
    }

    pub fn failed(&self) -> usize {
        self.totals().failed
    }

    pub fn totals(&self) -> RecordCounts {
        RecordType::MIGRATION_ORDER
            .iter()
            .map(|t| *self.counts(*t))
            .fold(RecordCounts::default(), |acc, c| RecordCounts {
                copied: acc.copied + c.copied,
                skipped: acc.skipped + c.skipped,
                failed: acc.failed + c.failed,
            })
    }

    /// Marks the run aborted. The first reason wins.
    pub fn abort(&mut self, reason: AbortReason) {
        self.status = MigrationStatus::Aborted;
        if self.abort_reason.is_none() {
            self.abort_reason = Some(reason);
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.status == MigrationStatus::Aborted
    }

    /// Settles the final status from the counts unless already aborted.
    pub fn finish(mut self) -> Self {
        if !self.is_aborted() {
            self.status = if self.failed() == 0 {
                MigrationStatus::Success
            } else {
                MigrationStatus::Partial
            };
        }
        self.finished_at = now_millis();
        self
    }
}

impl fmt::Display for MigrationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} copied, {} skipped, {} failed",
            self.copied(),
            self.skipped(),
            self.failed()
        )?;
        if let Some(reason) = &self.abort_reason {
            write!(f, " (aborted: {reason})")?;
        }
        Ok(())
    }
}
