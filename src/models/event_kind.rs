use serde::Serialize;

/// Kind of a stored event.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Connected,
    Disconnected,
    SessionSummary,
}

impl EventKind {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EventKind::Connected => "connected",
            EventKind::Disconnected => "disconnected",
            EventKind::SessionSummary => "SESSION_END",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "connected" => Some(EventKind::Connected),
            "disconnected" => Some(EventKind::Disconnected),
            "SESSION_END" => Some(EventKind::SessionSummary),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Connected => "connected",
            EventKind::Disconnected => "disconnected",
            EventKind::SessionSummary => "session",
        }
    }
}

/// Where an event came from. Not part of the dedup key.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventOrigin {
    Log,
    Synthetic,
}

impl EventOrigin {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EventOrigin::Log => "log",
            EventOrigin::Synthetic => "synthetic",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "log" => Some(EventOrigin::Log),
            "synthetic" => Some(EventOrigin::Synthetic),
            _ => None,
        }
    }
}
