use super::event_kind::{EventKind, EventOrigin};
use chrono::{NaiveDateTime, TimeDelta};
use serde::{Serialize, Serializer};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One canonical, immutable connection or traffic event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub timestamp: NaiveDateTime,
    pub user: String,
    pub kind: EventKind,
    pub bytes_received: u64,
    pub bytes_sent: u64,
    #[serde(rename = "duration_secs", serialize_with = "serialize_duration")]
    pub duration: Option<TimeDelta>, // only on SessionSummary
    pub origin: EventOrigin,
}

/// Identity of a logical event for duplicate suppression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupKey {
    pub timestamp: NaiveDateTime,
    pub user: String,
    pub kind: EventKind,
}

impl Event {
    /// Connection state change: byte counters are always zero.
    pub fn connection(timestamp: NaiveDateTime, user: &str, kind: EventKind) -> Self {
        Self {
            timestamp,
            user: user.to_string(),
            kind,
            bytes_received: 0,
            bytes_sent: 0,
            duration: None,
            origin: EventOrigin::Log,
        }
    }

    pub fn session_summary(
        timestamp: NaiveDateTime,
        user: &str,
        bytes_received: u64,
        bytes_sent: u64,
        duration: TimeDelta,
    ) -> Self {
        Self {
            timestamp,
            user: user.to_string(),
            kind: EventKind::SessionSummary,
            bytes_received,
            bytes_sent,
            duration: Some(duration),
            origin: EventOrigin::Log,
        }
    }

    pub fn with_origin(mut self, origin: EventOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            timestamp: self.timestamp,
            user: self.user.clone(),
            kind: self.kind,
        }
    }

    pub fn timestamp_str(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn duration_secs(&self) -> Option<i64> {
        self.duration.map(|d| d.num_seconds())
    }
}

fn serialize_duration<S: Serializer>(d: &Option<TimeDelta>, s: S) -> Result<S::Ok, S::Error> {
    match d {
        Some(d) => s.serialize_some(&d.num_seconds()),
        None => s.serialize_none(),
    }
}
