use crate::db::store::{EventReader, EventStore, InsertOutcome, check_storable};
use crate::errors::{AppError, AppResult};
use crate::models::{BandwidthUsage, DedupKey, Event, EventKind, TimeRange};
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::sync::{RwLock, RwLockReadGuard};

#[derive(Default)]
struct Tables {
    events: Vec<Event>,
    keys: HashSet<DedupKey>,
}

impl EventReader for Tables {
    fn query(&self, range: &TimeRange, user: Option<&str>) -> AppResult<Vec<Event>> {
        Ok(self
            .events
            .iter()
            .filter(|e| range.contains(&e.timestamp))
            .filter(|e| user.is_none_or(|u| e.user == u))
            .cloned()
            .collect())
    }

    fn count_distinct_users(&self, range: &TimeRange, kind: Option<EventKind>) -> AppResult<u64> {
        let users: HashSet<&str> = self
            .events
            .iter()
            .filter(|e| range.contains(&e.timestamp))
            .filter(|e| kind.is_none_or(|k| e.kind == k))
            .map(|e| e.user.as_str())
            .collect();
        Ok(users.len() as u64)
    }

    fn sum_bytes(&self, range: &TimeRange) -> AppResult<BandwidthUsage> {
        Ok(self
            .events
            .iter()
            .filter(|e| range.contains(&e.timestamp))
            .fold(BandwidthUsage::default(), |acc, e| BandwidthUsage {
                download: acc.download.saturating_add(e.bytes_received),
                upload: acc.upload.saturating_add(e.bytes_sent),
            }))
    }

    fn count_events(&self, range: &TimeRange) -> AppResult<u64> {
        Ok(self
            .events
            .iter()
            .filter(|e| range.contains(&e.timestamp))
            .count() as u64)
    }
}

/// In-process Event Store, used for tests and offline runs.
#[derive(Default)]
pub struct MemoryEventStore {
    tables: RwLock<Tables>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| AppError::Other("memory store lock poisoned".to_string()))
    }
}

impl EventReader for MemoryEventStore {
    fn query(&self, range: &TimeRange, user: Option<&str>) -> AppResult<Vec<Event>> {
        self.read()?.query(range, user)
    }

    fn count_distinct_users(&self, range: &TimeRange, kind: Option<EventKind>) -> AppResult<u64> {
        self.read()?.count_distinct_users(range, kind)
    }

    fn sum_bytes(&self, range: &TimeRange) -> AppResult<BandwidthUsage> {
        self.read()?.sum_bytes(range)
    }

    fn count_events(&self, range: &TimeRange) -> AppResult<u64> {
        self.read()?.count_events(range)
    }
}

impl EventStore for MemoryEventStore {
    fn insert(&self, event: &Event) -> AppResult<InsertOutcome> {
        check_storable(event)?;
        let mut tables = self
            .tables
            .write()
            .map_err(|_| AppError::StoreWrite("memory store lock poisoned".to_string()))?;

        if !tables.keys.insert(event.dedup_key()) {
            return Ok(InsertOutcome::Duplicate);
        }
        tables.events.push(event.clone());
        Ok(InsertOutcome::Inserted)
    }

    fn prune_before(&self, cutoff: NaiveDateTime) -> AppResult<usize> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| AppError::StoreWrite("memory store lock poisoned".to_string()))?;

        let before = tables.events.len();
        tables.events.retain(|e| e.timestamp >= cutoff);
        tables.keys.retain(|k| k.timestamp >= cutoff);
        Ok(before - tables.events.len())
    }

    fn read_consistent(
        &self,
        f: &mut dyn FnMut(&dyn EventReader) -> AppResult<()>,
    ) -> AppResult<()> {
        let tables = self.read()?;
        f(&*tables)
    }
}
