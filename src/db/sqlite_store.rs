use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::db::store::{EventReader, EventStore, InsertOutcome, check_storable};
use crate::errors::{AppError, AppResult};
use crate::models::{BandwidthUsage, Event, EventKind, TimeRange};
use chrono::NaiveDateTime;
use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard};

/// Event Store backed by the SQLite `events` table.
pub struct SqliteEventStore {
    conn: Mutex<Connection>,
}

/// Read access through a borrowed connection (plain or inside a transaction).
struct ConnReader<'a>(&'a Connection);

impl EventReader for ConnReader<'_> {
    fn query(&self, range: &TimeRange, user: Option<&str>) -> AppResult<Vec<Event>> {
        queries::query_events(self.0, range, user)
    }

    fn count_distinct_users(&self, range: &TimeRange, kind: Option<EventKind>) -> AppResult<u64> {
        queries::count_distinct_users(self.0, range, kind)
    }

    fn sum_bytes(&self, range: &TimeRange) -> AppResult<BandwidthUsage> {
        queries::sum_bytes(self.0, range)
    }

    fn count_events(&self, range: &TimeRange) -> AppResult<u64> {
        queries::count_events(self.0, range)
    }
}

impl SqliteEventStore {
    /// Open (or create) the database file and bring the schema up to date.
    pub fn open(path: &str) -> AppResult<Self> {
        let pool = DbPool::new(path)?;
        Self::from_pool(pool)
    }

    pub fn open_in_memory() -> AppResult<Self> {
        Self::from_pool(DbPool::in_memory()?)
    }

    pub fn from_pool(pool: DbPool) -> AppResult<Self> {
        init_db(&pool.conn)?;
        Ok(Self {
            conn: Mutex::new(pool.into_inner()),
        })
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Other("event store connection lock poisoned".to_string()))
    }
}

impl EventReader for SqliteEventStore {
    fn query(&self, range: &TimeRange, user: Option<&str>) -> AppResult<Vec<Event>> {
        ConnReader(&*self.lock()?).query(range, user)
    }

    fn count_distinct_users(&self, range: &TimeRange, kind: Option<EventKind>) -> AppResult<u64> {
        ConnReader(&*self.lock()?).count_distinct_users(range, kind)
    }

    fn sum_bytes(&self, range: &TimeRange) -> AppResult<BandwidthUsage> {
        ConnReader(&*self.lock()?).sum_bytes(range)
    }

    fn count_events(&self, range: &TimeRange) -> AppResult<u64> {
        ConnReader(&*self.lock()?).count_events(range)
    }
}

impl EventStore for SqliteEventStore {
    fn insert(&self, event: &Event) -> AppResult<InsertOutcome> {
        check_storable(event)?;
        let conn = self.lock()?;
        match queries::insert_event(&conn, event) {
            Ok(0) => Ok(InsertOutcome::Duplicate),
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) => Err(AppError::StoreWrite(e.to_string())),
        }
    }

    fn prune_before(&self, cutoff: NaiveDateTime) -> AppResult<usize> {
        queries::prune_before(&*self.lock()?, cutoff)
    }

    fn read_consistent(
        &self,
        f: &mut dyn FnMut(&dyn EventReader) -> AppResult<()>,
    ) -> AppResult<()> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;
        f(&ConnReader(&tx))?;
        tx.commit()?;
        Ok(())
    }

    fn record_log(&self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        ttlog(&*self.lock()?, operation, target, message)
    }
}
