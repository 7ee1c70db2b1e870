use crate::models::Event;
use serde::Serialize;

/// Flat row used by every export format.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct EventExport {
    pub timestamp: String,
    pub user: String,
    pub kind: String,
    pub bytes_received: u64,
    pub bytes_sent: u64,
    pub duration_secs: Option<i64>,
    pub origin: String,
}

impl From<&Event> for EventExport {
    fn from(e: &Event) -> Self {
        Self {
            timestamp: e.timestamp_str(),
            user: e.user.clone(),
            kind: e.kind.to_db_str().to_string(),
            bytes_received: e.bytes_received,
            bytes_sent: e.bytes_sent,
            duration_secs: e.duration_secs(),
            origin: e.origin.to_db_str().to_string(),
        }
    }
}
