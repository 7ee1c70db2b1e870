pub mod event;
pub mod event_kind;
pub mod metrics;
pub mod time_range;

pub use event::{DedupKey, Event};
pub use event_kind::{EventKind, EventOrigin};
pub use metrics::{ActiveSession, BandwidthPoint, BandwidthUsage, Heatmap, IngestReport, Metrics};
pub use time_range::TimeRange;
