//! Event Store contract.
//!
//! Backends implement [`EventReader`] for queries and [`EventStore`] for
//! writes. Inserting is the only operation that needs atomicity: the duplicate
//! check and the write must be a single step.

use crate::core::parser::MAX_EVENT_BYTES;
use crate::errors::{AppError, AppResult};
use crate::models::{BandwidthUsage, Event, EventKind, TimeRange};
use chrono::NaiveDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Duplicate,
}

/// Reject events no backend can hold unchanged.
pub fn check_storable(event: &Event) -> AppResult<()> {
    if event.user.is_empty() {
        return Err(AppError::StoreWrite("event without user".to_string()));
    }
    for (field, value) in [
        ("bytes_received", event.bytes_received),
        ("bytes_sent", event.bytes_sent),
    ] {
        if value > MAX_EVENT_BYTES {
            return Err(AppError::StoreWrite(format!(
                "{field} out of range: {value}"
            )));
        }
    }
    Ok(())
}

pub trait EventReader {
    /// Events in `range`, optionally restricted to one user. The order is
    /// stable across calls while nothing is inserted; sort explicitly for
    /// chronological order.
    fn query(&self, range: &TimeRange, user: Option<&str>) -> AppResult<Vec<Event>>;

    /// Number of distinct users among matching events.
    fn count_distinct_users(&self, range: &TimeRange, kind: Option<EventKind>) -> AppResult<u64>;

    /// Received/sent totals over every event in `range`, regardless of kind.
    /// Totals saturate at `u64::MAX`.
    fn sum_bytes(&self, range: &TimeRange) -> AppResult<BandwidthUsage>;

    fn count_events(&self, range: &TimeRange) -> AppResult<u64>;
}

pub trait EventStore: EventReader + Send + Sync {
    fn insert(&self, event: &Event) -> AppResult<InsertOutcome>;

    /// Retention: remove events older than `cutoff`.
    fn prune_before(&self, cutoff: NaiveDateTime) -> AppResult<usize>;

    /// Run several reads against one committed view of the store.
    fn read_consistent(
        &self,
        f: &mut dyn FnMut(&dyn EventReader) -> AppResult<()>,
    ) -> AppResult<()>;

    /// Audit trail hook. Backends without a log table ignore it.
    fn record_log(&self, _operation: &str, _target: &str, _message: &str) -> AppResult<()> {
        Ok(())
    }
}
