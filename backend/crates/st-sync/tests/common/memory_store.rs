use st_core::{Record, RecordStore, RecordType, StoreError, StoreResult, StoreSnapshot};
use st_sync::MigrationCancel;

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

/// Injected misbehaviour for `MemoryStore`.
#[derive(Debug, Clone, PartialEq)]
pub enum Fault {
    /// Every insert fails with `NetworkUnavailable` once this many records
    /// have been written.
    NetworkDownAfter(usize),
    /// Inserts fail with `RemoteQuotaExceeded` once this many records have
    /// been written.
    QuotaAfter(usize),
    /// Inserting this id reports a constraint violation.
    Conflict(Uuid),
    /// The record is written but the first acknowledgement is lost.
    LostAck(Uuid),
    /// `fetch_all` fails with `PersistenceUnavailable`.
    FetchUnavailable,
    /// `exists` always fails with `NetworkUnavailable`.
    Unreachable,
    /// `exists` and `fetch_all` fail with `RemoteQuotaExceeded`.
    ReadQuota,
}

#[derive(Default)]
struct Inner {
    records: HashMap<Uuid, Record>,
    insert_order: Vec<Uuid>,
    insert_calls: usize,
    in_flight: usize,
    peak_in_flight: usize,
    accept_orphans: bool,
    faults: Vec<Fault>,
    lost_acks: HashSet<Uuid>,
    insert_delay: Duration,
    cancel_after: Option<(usize, MigrationCancel)>,
}

/// Thread-safe in-memory `RecordStore` that enforces subscription
/// references and can be told to fail.
pub struct MemoryStore {
    label: &'static str,
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Stores records directly, bypassing faults and insert bookkeeping.
    pub fn seeded(label: &'static str, records: impl IntoIterator<Item = Record>) -> Self {
        let store = Self::new(label);
        store.seed(records);
        store
    }

    pub fn seed(&self, records: impl IntoIterator<Item = Record>) {
        let mut inner = self.inner();
        for record in records {
            inner.records.insert(record.id, record);
        }
    }

    pub fn inject(&self, fault: Fault) {
        self.inner().faults.push(fault);
    }

    pub fn clear_faults(&self) {
        self.inner().faults.clear();
    }

    /// Accepts dependents whose subscription is absent, like the HTTP store.
    pub fn accept_orphans(&self) {
        self.inner().accept_orphans = true;
    }

    pub fn set_insert_delay(&self, delay: Duration) {
        self.inner().insert_delay = delay;
    }

    /// Cancels `cancel` right after the `count`-th successful insert.
    pub fn cancel_after(&self, count: usize, cancel: MigrationCancel) {
        self.inner().cancel_after = Some((count, cancel));
    }

    pub fn len(&self) -> usize {
        self.inner().records.len()
    }

    pub fn count(&self, record_type: RecordType) -> usize {
        self.inner()
            .records
            .values()
            .filter(|r| r.record_type == record_type)
            .count()
    }

    pub fn get(&self, id: Uuid) -> Option<Record> {
        self.inner().records.get(&id).cloned()
    }

    /// Ids in the order inserts landed.
    pub fn insert_order(&self) -> Vec<Uuid> {
        self.inner().insert_order.clone()
    }

    pub fn insert_calls(&self) -> usize {
        self.inner().insert_calls
    }

    /// Most inserts that were running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.inner().peak_in_flight
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store lock poisoned")
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn label(&self) -> &str {
        self.label
    }

    async fn fetch_all(&self, record_type: RecordType) -> StoreResult<StoreSnapshot> {
        let inner = self.inner();
        if inner.faults.contains(&Fault::FetchUnavailable) {
            return Err(StoreError::persistence_unavailable("disk unavailable"));
        }
        if inner.faults.contains(&Fault::ReadQuota) {
            return Err(StoreError::quota_exceeded("request quota used up"));
        }

        let records: Vec<Record> = inner
            .records
            .values()
            .filter(|r| r.record_type == record_type)
            .cloned()
            .collect();
        Ok(StoreSnapshot::from_records(records))
    }

    async fn insert(&self, record: &Record) -> StoreResult<()> {
        let delay = {
            let mut inner = self.inner();
            inner.in_flight += 1;
            inner.peak_in_flight = inner.peak_in_flight.max(inner.in_flight);
            inner.insert_delay
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let result = self.write(record);
        self.inner().in_flight -= 1;
        result
    }

    async fn exists(&self, id: Uuid) -> StoreResult<bool> {
        let inner = self.inner();
        if inner.faults.contains(&Fault::Unreachable) {
            return Err(StoreError::network_unavailable("host unreachable"));
        }
        if inner.faults.contains(&Fault::ReadQuota) {
            return Err(StoreError::quota_exceeded("request quota used up"));
        }
        Ok(inner.records.contains_key(&id))
    }
}

impl MemoryStore {
    fn write(&self, record: &Record) -> StoreResult<()> {
        let mut inner = self.inner();
        inner.insert_calls += 1;
        let written = inner.insert_order.len();

        for fault in &inner.faults {
            match fault {
                Fault::NetworkDownAfter(k) if written >= *k => {
                    return Err(StoreError::network_unavailable("connection refused"));
                }
                Fault::QuotaAfter(k) if written >= *k => {
                    return Err(StoreError::quota_exceeded("storage full"));
                }
                Fault::Conflict(id) if *id == record.id => {
                    return Err(StoreError::constraint_violation(record.id, "injected conflict"));
                }
                _ => {}
            }
        }

        if let Some(existing) = inner.records.get(&record.id) {
            return if existing.same_contents(record) {
                Ok(())
            } else {
                Err(StoreError::constraint_violation(record.id, "different contents"))
            };
        }

        if let Some(parent) = record.parent_id
            && !inner.accept_orphans
            && !inner.records.contains_key(&parent)
        {
            return Err(StoreError::rejected(format!("missing subscription {parent}")));
        }

        inner.records.insert(record.id, record.clone());
        inner.insert_order.push(record.id);

        if let Some((count, cancel)) = &inner.cancel_after
            && inner.insert_order.len() >= *count
        {
            cancel.cancel();
        }

        let lose_ack = inner.faults.contains(&Fault::LostAck(record.id));
        if lose_ack && inner.lost_acks.insert(record.id) {
            return Err(StoreError::network_unavailable("response lost"));
        }

        Ok(())
    }
}
