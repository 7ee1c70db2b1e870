use wgmonitor::db::log::load_log;
use wgmonitor::db::migrate::{applied_versions, run_pending_migrations};
use wgmonitor::db::pool::DbPool;

mod common;
use common::setup_test_db;

#[test]
fn migrations_run_once_and_are_logged() {
    let db_path = setup_test_db("migrations_once");
    let pool = DbPool::new(&db_path).expect("open db");

    let first = run_pending_migrations(&pool.conn).expect("migrate");
    let second = run_pending_migrations(&pool.conn).expect("migrate again");

    assert_eq!(first, 3);
    assert_eq!(second, 0);

    let versions = applied_versions(&pool.conn).unwrap();
    assert_eq!(versions.len(), 3);
    assert!(versions[0].ends_with("create_events"));

    let log = load_log(&pool.conn).unwrap();
    assert!(log.iter().all(|e| e.operation == "migration_applied"));
}

#[test]
fn dedup_index_drops_existing_duplicates() {
    let db_path = setup_test_db("migrations_dedup");
    let pool = DbPool::new(&db_path).expect("open db");

    // schema as it was before the unique index existed
    pool.conn
        .execute_batch(
            r#"
            CREATE TABLE log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL, operation TEXT NOT NULL,
                target TEXT DEFAULT '', message TEXT NOT NULL
            );
            INSERT INTO log (date, operation, target, message)
            VALUES ('2025-03-01T00:00:00+00:00', 'migration_applied',
                    '20250301_0001_create_events', 'Created events table');
            CREATE TABLE events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL, user TEXT NOT NULL, kind TEXT NOT NULL,
                bytes_received INTEGER NOT NULL DEFAULT 0,
                bytes_sent INTEGER NOT NULL DEFAULT 0,
                duration_secs INTEGER, created_at TEXT NOT NULL
            );
            INSERT INTO events (timestamp, user, kind, created_at) VALUES
                ('2025-03-01 10:00:00', 'alice', 'connected', 'x'),
                ('2025-03-01 10:00:00', 'alice', 'connected', 'y');
            "#,
        )
        .unwrap();

    assert_eq!(run_pending_migrations(&pool.conn).unwrap(), 2);

    let (count, created): (i64, String) = pool
        .conn
        .query_row("SELECT COUNT(*), MIN(created_at) FROM events", [], |r| {
            Ok((r.get(0)?, r.get(1)?))
        })
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(created, "x");
}
