use super::event_kind::EventKind;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::ops::AddAssign;

/// Cumulative byte totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BandwidthUsage {
    pub download: u64,
    pub upload: u64,
}

/// Point-in-time aggregate pushed to the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub active_users: u64,
    pub bandwidth_usage: BandwidthUsage,
    pub total_connections: u64,
}

/// Outcome of one ingest pass over one or more sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub lines_read: u64,
    pub events_parsed: u64,
    pub events_inserted: u64,
    pub events_duplicate: u64,
    pub parse_failures: u64,
    pub store_failures: u64,
}

impl AddAssign<&IngestReport> for IngestReport {
    fn add_assign(&mut self, rhs: &IngestReport) {
        self.lines_read += rhs.lines_read;
        self.events_parsed += rhs.events_parsed;
        self.events_inserted += rhs.events_inserted;
        self.events_duplicate += rhs.events_duplicate;
        self.parse_failures += rhs.parse_failures;
        self.store_failures += rhs.store_failures;
    }
}

/// Row of the active sessions table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveSession {
    pub user: String,
    pub timestamp: NaiveDateTime,
    pub kind: EventKind,
    pub bytes_received: u64,
    pub bytes_sent: u64,
}

/// Download/upload totals for one hour bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BandwidthPoint {
    pub hour_start: NaiveDateTime,
    pub download: u64,
    pub upload: u64,
}

pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Event counts keyed by hour of day (rows) and day of week (columns, Mon first).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Heatmap {
    pub cells: [[u64; 7]; 24],
}

impl Heatmap {
    pub fn get(&self, hour: usize, weekday: usize) -> u64 {
        self.cells[hour][weekday]
    }

    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().sum()
    }

    pub fn max(&self) -> u64 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }
}
