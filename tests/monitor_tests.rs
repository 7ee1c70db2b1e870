use chrono::{NaiveDateTime, TimeDelta};
use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use std::time::Duration;
use wgmonitor::core::monitor::{Monitor, MonitorSettings};
use wgmonitor::core::sink::{JsonLinesSink, MetricsSink, MetricsUpdate, SourceStatus};
use wgmonitor::core::source::{FileSource, LogSource};
use wgmonitor::db::log::load_log;
use wgmonitor::db::pool::DbPool;
use wgmonitor::db::{EventReader, EventStore, InsertOutcome, MemoryEventStore, SqliteEventStore};
use wgmonitor::errors::{AppError, AppResult};
use wgmonitor::models::{BandwidthUsage, Event, EventKind, TimeRange};

mod common;
use common::{SAMPLE_LINES, setup_test_db, temp_out, ts, write_log};

#[derive(Clone, Default)]
struct CollectingSink(Rc<RefCell<Vec<MetricsUpdate>>>);

impl MetricsSink for CollectingSink {
    fn publish(&mut self, update: &MetricsUpdate) -> AppResult<()> {
        self.0.borrow_mut().push(update.clone());
        Ok(())
    }
}

fn settings(threshold: u32) -> MonitorSettings {
    MonitorSettings {
        interval: Duration::from_millis(1),
        retry_backoff: Duration::from_millis(1),
        unavailable_threshold: threshold,
        active_window: TimeDelta::minutes(5),
    }
}

fn file_sources(paths: &[&str]) -> Vec<Box<dyn LogSource>> {
    paths
        .iter()
        .map(|p| Box::new(FileSource::new(*p)) as Box<dyn LogSource>)
        .collect()
}

#[test]
fn cycle_ingests_and_publishes_metrics() {
    let path = write_log("monitor_cycle", &SAMPLE_LINES);
    let store = MemoryEventStore::new();
    let sink = CollectingSink::default();

    let mut monitor = Monitor::new(
        &store,
        file_sources(&[&path]),
        Box::new(sink.clone()),
        settings(3),
    );
    let outcome = monitor.run_cycle(ts("2025-03-01 10:16:00"));

    assert!(outcome.healthy);
    assert!(outcome.update.fresh);
    assert_eq!(outcome.update.status, SourceStatus::Ok);
    assert_eq!(outcome.update.report.events_inserted, 3);
    assert_eq!(outcome.update.metrics.active_users, 1);
    assert_eq!(outcome.update.metrics.total_connections, 3);
    assert_eq!(sink.0.borrow().len(), 1);
}

#[test]
fn missing_source_degrades_after_threshold_and_recovers() {
    let path = temp_out("monitor_degraded", "log");
    let store = MemoryEventStore::new();
    let sink = CollectingSink::default();
    let mut monitor = Monitor::new(
        &store,
        file_sources(&[&path]),
        Box::new(sink.clone()),
        settings(2),
    );
    let now = ts("2025-03-01 10:16:00");

    let first = monitor.run_cycle(now);
    assert!(!first.healthy);
    assert_eq!(first.update.status, SourceStatus::Ok);

    let second = monitor.run_cycle(now);
    assert_eq!(
        second.update.status,
        SourceStatus::Degraded {
            consecutive_failures: 2,
            sources: vec![path.clone()],
        }
    );
    // metrics keep flowing while degraded
    assert!(second.update.fresh);
    assert_eq!(monitor.consecutive_unavailable(), 2);

    fs::write(&path, format!("{}\n", SAMPLE_LINES[0])).unwrap();
    let third = monitor.run_cycle(now);
    assert!(third.healthy);
    assert_eq!(third.update.status, SourceStatus::Ok);
    assert_eq!(monitor.consecutive_unavailable(), 0);
    assert_eq!(sink.0.borrow().len(), 3);
}

#[test]
fn degradation_and_recovery_are_logged() {
    let db_path = setup_test_db("monitor_logged");
    let path = temp_out("monitor_logged", "log");

    {
        let store = SqliteEventStore::open(&db_path).unwrap();
        let mut monitor = Monitor::new(
            &store,
            file_sources(&[&path]),
            Box::new(CollectingSink::default()),
            settings(1),
        );
        monitor.run_cycle(ts("2025-03-01 10:00:00"));
        monitor.run_cycle(ts("2025-03-01 10:00:10"));
        fs::write(&path, "").unwrap();
        monitor.run_cycle(ts("2025-03-01 10:00:20"));
    }

    let pool = DbPool::new(&db_path).unwrap();
    let ops: Vec<String> = load_log(&pool.conn)
        .unwrap()
        .into_iter()
        .map(|e| e.operation)
        .filter(|op| op.starts_with("source_"))
        .collect();
    assert_eq!(ops, vec!["source_unavailable", "source_recovered"]);
}

#[test]
fn run_stops_after_requested_cycles() {
    let path = write_log("monitor_run", &SAMPLE_LINES);
    let store = MemoryEventStore::new();
    let sink = CollectingSink::default();
    let mut monitor = Monitor::new(
        &store,
        file_sources(&[&path]),
        Box::new(sink.clone()),
        settings(3),
    );

    assert_eq!(monitor.run(Some(2)), 2);
    assert_eq!(sink.0.borrow().len(), 2);
}

#[test]
fn json_lines_sink_writes_one_object_per_update() {
    let path = write_log("monitor_json", &SAMPLE_LINES);
    let store = MemoryEventStore::new();
    let mut monitor = Monitor::new(
        &store,
        file_sources(&[&path]),
        Box::new(CollectingSink::default()),
        settings(3),
    );
    let update = monitor.run_cycle(ts("2025-03-01 10:16:00")).update;

    let mut sink = JsonLinesSink::new(Vec::new());
    sink.publish(&update).unwrap();
    sink.publish(&update).unwrap();
    let out = String::from_utf8(sink.into_inner()).unwrap();

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    let v: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(v["metrics"]["active_users"], 1);
    assert_eq!(v["metrics"]["bandwidth_usage"]["download"], 1_572_864);
    assert_eq!(v["status"]["state"], "ok");
    assert_eq!(v["fresh"], true);
}

/// Memory store whose audit log is never writable.
#[derive(Default)]
struct NoAuditStore(MemoryEventStore);

impl EventReader for NoAuditStore {
    fn query(&self, range: &TimeRange, user: Option<&str>) -> AppResult<Vec<Event>> {
        self.0.query(range, user)
    }
    fn count_distinct_users(&self, range: &TimeRange, kind: Option<EventKind>) -> AppResult<u64> {
        self.0.count_distinct_users(range, kind)
    }
    fn sum_bytes(&self, range: &TimeRange) -> AppResult<BandwidthUsage> {
        self.0.sum_bytes(range)
    }
    fn count_events(&self, range: &TimeRange) -> AppResult<u64> {
        self.0.count_events(range)
    }
}

impl EventStore for NoAuditStore {
    fn insert(&self, event: &Event) -> AppResult<InsertOutcome> {
        self.0.insert(event)
    }
    fn prune_before(&self, cutoff: NaiveDateTime) -> AppResult<usize> {
        self.0.prune_before(cutoff)
    }
    fn read_consistent(
        &self,
        f: &mut dyn FnMut(&dyn EventReader) -> AppResult<()>,
    ) -> AppResult<()> {
        self.0.read_consistent(f)
    }
    fn record_log(&self, _: &str, _: &str, _: &str) -> AppResult<()> {
        Err(AppError::Other("log table is read-only".into()))
    }
}

#[test]
fn audit_log_failures_do_not_break_health_tracking() {
    let path = temp_out("monitor_no_audit", "log");
    let store = NoAuditStore::default();
    let mut monitor = Monitor::new(
        &store,
        file_sources(&[&path]),
        Box::new(CollectingSink::default()),
        settings(1),
    );
    let now = ts("2025-03-01 10:00:00");

    let degraded = monitor.run_cycle(now);
    assert!(matches!(degraded.update.status, SourceStatus::Degraded { .. }));

    fs::write(&path, format!("{}\n", SAMPLE_LINES[0])).unwrap();
    let recovered = monitor.run_cycle(now);
    assert!(recovered.healthy);
    assert_eq!(recovered.update.status, SourceStatus::Ok);
    assert_eq!(recovered.update.report.events_inserted, 1);
    assert_eq!(monitor.consecutive_unavailable(), 0);
}
