use chrono::TimeDelta;
use wgmonitor::core::aggregator::{
    MetricsAggregator, activity_heatmap, days_before, hourly_bandwidth,
};
use wgmonitor::core::api::QueryApi;
use wgmonitor::db::{EventStore, MemoryEventStore, SqliteEventStore};
use wgmonitor::models::{Event, EventKind};

mod common;
use common::ts;

fn connected(at: &str, user: &str) -> Event {
    Event::connection(ts(at), user, EventKind::Connected)
}

fn summary(at: &str, user: &str, rx: u64, tx: u64) -> Event {
    Event::session_summary(ts(at), user, rx, tx, TimeDelta::minutes(10))
}

fn seed(store: &dyn EventStore) {
    for ev in [
        connected("2025-03-01 10:04:59", "bob"),
        connected("2025-03-01 10:05:00", "alice"),
        connected("2025-03-01 10:07:00", "alice"),
        Event::connection(ts("2025-03-01 10:08:00"), "carol", EventKind::Disconnected),
        connected("2025-03-01 10:10:00", "dave"),
        summary("2025-03-01 09:00:00", "erin", 1_572_864, 262_144),
    ] {
        store.insert(&ev).unwrap();
    }
}

#[test]
fn active_users_window_is_inclusive_at_both_ends() {
    let sqlite = SqliteEventStore::open_in_memory().unwrap();
    let memory = MemoryEventStore::new();

    let stores: [&dyn EventStore; 2] = [&sqlite, &memory];
    for store in stores {
        seed(store);
        let metrics = MetricsAggregator::new(store)
            .snapshot(ts("2025-03-01 10:10:00"))
            .unwrap();

        // alice (10:05:00 boundary) and dave (10:10:00); bob is one second late
        assert_eq!(metrics.active_users, 2);
        assert_eq!(metrics.total_connections, 6);
        assert_eq!(metrics.bandwidth_usage.download, 1_572_864);
        assert_eq!(metrics.bandwidth_usage.upload, 262_144);
    }
}

#[test]
fn disconnect_does_not_end_activity() {
    let store = MemoryEventStore::new();
    store.insert(&connected("2025-03-01 10:06:00", "alice")).unwrap();
    store
        .insert(&Event::connection(
            ts("2025-03-01 10:07:00"),
            "alice",
            EventKind::Disconnected,
        ))
        .unwrap();

    let metrics = MetricsAggregator::new(&store)
        .snapshot(ts("2025-03-01 10:10:00"))
        .unwrap();
    assert_eq!(metrics.active_users, 1);
}

#[test]
fn custom_active_window() {
    let store = MemoryEventStore::new();
    seed(&store);

    let metrics = MetricsAggregator::new(&store)
        .with_active_window(TimeDelta::minutes(1))
        .snapshot(ts("2025-03-01 10:10:00"))
        .unwrap();
    assert_eq!(metrics.active_users, 1);
}

#[test]
fn empty_store_gives_zero_metrics() {
    let store = MemoryEventStore::new();
    let metrics = MetricsAggregator::new(&store)
        .snapshot(ts("2025-03-01 10:10:00"))
        .unwrap();

    assert_eq!(metrics.active_users, 0);
    assert_eq!(metrics.total_connections, 0);
    assert_eq!(metrics.bandwidth_usage.download, 0);
}

#[test]
fn historical_series_is_sorted_and_bounded() {
    let store = MemoryEventStore::new();
    store.insert(&connected("2025-03-07 12:00:00", "zed")).unwrap();
    store.insert(&connected("2025-02-20 12:00:00", "old")).unwrap();
    store.insert(&connected("2025-03-05 08:00:00", "amy")).unwrap();

    let series = MetricsAggregator::new(&store)
        .historical_series(ts("2025-03-08 00:00:00"), 7)
        .unwrap();

    let users: Vec<&str> = series.iter().map(|e| e.user.as_str()).collect();
    assert_eq!(users, vec!["amy", "zed"]);
}

#[test]
fn active_sessions_lists_recent_events_in_order() {
    let store = MemoryEventStore::new();
    seed(&store);

    let sessions = MetricsAggregator::new(&store)
        .active_sessions(ts("2025-03-01 10:10:00"), TimeDelta::minutes(5))
        .unwrap();

    let rows: Vec<(&str, EventKind)> = sessions
        .iter()
        .map(|s| (s.user.as_str(), s.kind))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("alice", EventKind::Connected),
            ("alice", EventKind::Connected),
            ("carol", EventKind::Disconnected),
            ("dave", EventKind::Connected),
        ]
    );
}

#[test]
fn heatmap_of_nothing_is_all_zero() {
    let heatmap = activity_heatmap(&[]);
    assert_eq!(heatmap.total(), 0);
    assert_eq!(heatmap.max(), 0);
}

#[test]
fn heatmap_buckets_by_hour_and_weekday() {
    // 2025-03-05 is a Wednesday
    let events = [
        connected("2025-03-05 10:00:00", "alice"),
        connected("2025-03-05 10:59:59", "bob"),
        connected("2025-03-09 23:30:00", "carol"),
    ];
    let heatmap = activity_heatmap(&events);

    assert_eq!(heatmap.get(10, 2), 2);
    assert_eq!(heatmap.get(23, 6), 1);
    assert_eq!(heatmap.total(), 3);
    assert_eq!(heatmap.max(), 2);
}

#[test]
fn hourly_bandwidth_sums_per_clock_hour() {
    let events = [
        summary("2025-03-01 11:20:00", "bob", 5, 6),
        summary("2025-03-01 10:05:00", "alice", 100, 10),
        summary("2025-03-01 10:55:00", "bob", 1, 2),
        connected("2025-03-01 11:00:00", "carol"),
    ];

    let points = hourly_bandwidth(&events);

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].hour_start, ts("2025-03-01 10:00:00"));
    assert_eq!((points[0].download, points[0].upload), (101, 12));
    assert_eq!(points[1].hour_start, ts("2025-03-01 11:00:00"));
    assert_eq!((points[1].download, points[1].upload), (5, 6));
}

#[test]
fn huge_history_span_returns_everything() {
    let store = MemoryEventStore::new();
    seed(&store);

    let series = MetricsAggregator::new(&store)
        .historical_series(ts("2025-03-08 00:00:00"), u32::MAX)
        .unwrap();
    assert_eq!(series.len(), 6);

    let api = QueryApi::new(&store, TimeDelta::minutes(5));
    assert_eq!(api.get_usage_history(u32::MAX).unwrap().len(), 6);
    assert_eq!(api.get_activity_heatmap(u32::MAX).unwrap().total(), 6);
}

#[test]
fn huge_windows_are_open_ended() {
    let store = MemoryEventStore::new();
    seed(&store);
    let now = ts("2025-03-01 10:10:00");

    let metrics = MetricsAggregator::new(&store)
        .with_active_window(TimeDelta::MAX)
        .snapshot(now)
        .unwrap();
    assert_eq!(metrics.active_users, 3);

    let sessions = MetricsAggregator::new(&store)
        .active_sessions(now, TimeDelta::MAX)
        .unwrap();
    assert_eq!(sessions.len(), 6);
}

#[test]
fn days_before_stops_at_the_calendar_edge() {
    let now = ts("2025-03-08 00:00:00");
    assert_eq!(days_before(now, 7), Some(ts("2025-03-01 00:00:00")));
    assert_eq!(days_before(now, u32::MAX), None);
}
