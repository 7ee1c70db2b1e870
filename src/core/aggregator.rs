//! Metrics Aggregator: derived statistics over the Event Store.

use crate::db::{EventReader, EventStore};
use crate::errors::AppResult;
use crate::models::{
    ActiveSession, BandwidthPoint, Event, EventKind, Heatmap, Metrics, TimeRange,
};
use chrono::{Datelike, NaiveDateTime, SubsecRound, TimeDelta, Timelike};
use std::collections::BTreeMap;

pub const DEFAULT_ACTIVE_WINDOW_MINUTES: i64 = 5;

pub struct MetricsAggregator<'a> {
    store: &'a dyn EventStore,
    active_window: TimeDelta,
}

impl<'a> MetricsAggregator<'a> {
    pub fn new(store: &'a dyn EventStore) -> Self {
        Self {
            store,
            active_window: TimeDelta::minutes(DEFAULT_ACTIVE_WINDOW_MINUTES),
        }
    }

    pub fn with_active_window(mut self, window: TimeDelta) -> Self {
        self.active_window = window;
        self
    }

    pub fn active_window(&self) -> TimeDelta {
        self.active_window
    }

    /// Current metrics.
    ///
    /// A user is active when it has a `Connected` event in
    /// `[now - window, now]`; later disconnects are not taken into account.
    /// Bandwidth and connection totals cover every stored event.
    pub fn snapshot(&self, now: NaiveDateTime) -> AppResult<Metrics> {
        let now = now.trunc_subsecs(0);
        let active = trailing_window(now, self.active_window);
        let mut metrics = Metrics::default();

        self.store.read_consistent(&mut |reader: &dyn EventReader| {
            metrics.active_users =
                reader.count_distinct_users(&active, Some(EventKind::Connected))?;
            metrics.bandwidth_usage = reader.sum_bytes(&TimeRange::all())?;
            metrics.total_connections = reader.count_events(&TimeRange::all())?;
            Ok(())
        })?;

        Ok(metrics)
    }

    /// Events from the last `days` days, oldest first.
    pub fn historical_series(&self, now: NaiveDateTime, days: u32) -> AppResult<Vec<Event>> {
        let range = match days_before(now.trunc_subsecs(0), days) {
            Some(since) => TimeRange::since(since),
            None => TimeRange::all(),
        };
        let mut events = self.store.query(&range, None)?;
        sort_chronologically(&mut events);
        Ok(events)
    }

    /// Every event in `[now - window, now]`, oldest first.
    pub fn active_sessions(
        &self,
        now: NaiveDateTime,
        window: TimeDelta,
    ) -> AppResult<Vec<ActiveSession>> {
        let now = now.trunc_subsecs(0);
        let mut events = self
            .store
            .query(&trailing_window(now, window), None)?;
        sort_chronologically(&mut events);

        Ok(events
            .into_iter()
            .map(|e| ActiveSession {
                user: e.user,
                timestamp: e.timestamp,
                kind: e.kind,
                bytes_received: e.bytes_received,
                bytes_sent: e.bytes_sent,
            })
            .collect())
    }
}

/// `now - days`, or `None` when that lies before the earliest representable
/// instant.
pub fn days_before(now: NaiveDateTime, days: u32) -> Option<NaiveDateTime> {
    TimeDelta::try_days(i64::from(days)).and_then(|d| now.checked_sub_signed(d))
}

/// `[now - window, now]`; a window reaching past the calendar is open-ended.
fn trailing_window(now: NaiveDateTime, window: TimeDelta) -> TimeRange {
    TimeRange {
        start: now.checked_sub_signed(window),
        end: Some(now),
    }
}

pub fn sort_chronologically(events: &mut [Event]) {
    events.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.user.cmp(&b.user))
            .then_with(|| a.kind.cmp(&b.kind))
    });
}

/// Count events per (hour of day, day of week).
pub fn activity_heatmap(events: &[Event]) -> Heatmap {
    let mut heatmap = Heatmap::default();
    for e in events {
        let hour = e.timestamp.hour() as usize;
        let weekday = e.timestamp.weekday().num_days_from_monday() as usize;
        heatmap.cells[hour][weekday] += 1;
    }
    heatmap
}

/// Download/upload sums per clock hour, oldest first.
pub fn hourly_bandwidth(events: &[Event]) -> Vec<BandwidthPoint> {
    let mut buckets: BTreeMap<NaiveDateTime, (u64, u64)> = BTreeMap::new();
    for e in events {
        let Some(hour_start) = e
            .timestamp
            .with_minute(0)
            .and_then(|t| t.with_second(0))
        else {
            continue;
        };
        let entry = buckets.entry(hour_start).or_default();
        entry.0 = entry.0.saturating_add(e.bytes_received);
        entry.1 = entry.1.saturating_add(e.bytes_sent);
    }

    buckets
        .into_iter()
        .map(|(hour_start, (download, upload))| BandwidthPoint {
            hour_start,
            download,
            upload,
        })
        .collect()
}
