use crate::errors::{AppError, AppResult};
use crate::models::event::TIMESTAMP_FORMAT;
use crate::models::{BandwidthUsage, Event, EventKind, EventOrigin, TimeRange};
use chrono::{Local, NaiveDateTime, TimeDelta};
use rusqlite::{Connection, Result, Row, ToSql, params};

const EVENT_COLUMNS: &str =
    "timestamp, user, kind, bytes_received, bytes_sent, duration_secs, origin";

fn conversion_error(err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(err))
}

fn to_sql_int(v: u64) -> Result<i64> {
    i64::try_from(v).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn from_sql_int(v: i64) -> u64 {
    u64::try_from(v).unwrap_or(0)
}

pub fn map_row(row: &Row) -> Result<Event> {
    let ts_str: String = row.get("timestamp")?;
    let timestamp = NaiveDateTime::parse_from_str(&ts_str, TIMESTAMP_FORMAT)
        .map_err(|_| conversion_error(AppError::InvalidDate(ts_str.clone())))?;

    let kind_str: String = row.get("kind")?;
    let kind = EventKind::from_db_str(&kind_str)
        .ok_or_else(|| conversion_error(AppError::Other(format!("Invalid kind: {kind_str}"))))?;

    let origin_str: String = row.get("origin")?;
    let origin = EventOrigin::from_db_str(&origin_str).ok_or_else(|| {
        conversion_error(AppError::Other(format!("Invalid origin: {origin_str}")))
    })?;

    let duration: Option<i64> = row.get("duration_secs")?;

    Ok(Event {
        timestamp,
        user: row.get("user")?,
        kind,
        bytes_received: from_sql_int(row.get("bytes_received")?),
        bytes_sent: from_sql_int(row.get("bytes_sent")?),
        duration: duration.and_then(TimeDelta::try_seconds),
        origin,
    })
}

/// Insert unless the dedup key is already present. Returns the number of
/// rows written (0 on duplicate). The check and the write are one statement.
pub fn insert_event(conn: &Connection, ev: &Event) -> Result<usize> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO events
            (timestamp, user, kind, bytes_received, bytes_sent, duration_secs, origin, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(timestamp, user, kind) DO NOTHING",
    )?;
    let received = to_sql_int(ev.bytes_received)?;
    let sent = to_sql_int(ev.bytes_sent)?;
    stmt.execute(params![
        ev.timestamp_str(),
        ev.user,
        ev.kind.to_db_str(),
        received,
        sent,
        ev.duration_secs(),
        ev.origin.to_db_str(),
        Local::now().to_rfc3339(),
    ])
}

/// Append range / user / kind conditions to `sql`.
fn build_filtered_query(
    base_query: &str,
    range: &TimeRange,
    user: Option<&str>,
    kind: Option<EventKind>,
) -> (String, Vec<String>) {
    let mut query = base_query.to_string();
    let mut conditions = Vec::new();
    let mut params: Vec<String> = Vec::new();

    if let Some(start) = range.start {
        conditions.push(format!("timestamp >= ?{}", params.len() + 1));
        params.push(start.format(TIMESTAMP_FORMAT).to_string());
    }
    if let Some(end) = range.end {
        conditions.push(format!("timestamp <= ?{}", params.len() + 1));
        params.push(end.format(TIMESTAMP_FORMAT).to_string());
    }
    if let Some(u) = user {
        conditions.push(format!("user = ?{}", params.len() + 1));
        params.push(u.to_string());
    }
    if let Some(k) = kind {
        conditions.push(format!("kind = ?{}", params.len() + 1));
        params.push(k.to_db_str().to_string());
    }

    if !conditions.is_empty() {
        query.push_str(" WHERE ");
        query.push_str(&conditions.join(" AND "));
    }

    (query, params)
}

fn as_params(params: &[String]) -> Vec<&dyn ToSql> {
    params.iter().map(|s| s as &dyn ToSql).collect()
}

/// Events in `range`, optionally for one user, in insertion order.
pub fn query_events(
    conn: &Connection,
    range: &TimeRange,
    user: Option<&str>,
) -> AppResult<Vec<Event>> {
    let base = format!("SELECT {EVENT_COLUMNS} FROM events");
    let (mut sql, params) = build_filtered_query(&base, range, user, None);
    sql.push_str(" ORDER BY id ASC");

    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(as_params(&params).as_slice(), map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_distinct_users(
    conn: &Connection,
    range: &TimeRange,
    kind: Option<EventKind>,
) -> AppResult<u64> {
    let (sql, params) = build_filtered_query(
        "SELECT COUNT(DISTINCT user) FROM events",
        range,
        None,
        kind,
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let n: i64 = stmt.query_row(as_params(&params).as_slice(), |r| r.get(0))?;
    Ok(from_sql_int(n))
}

pub fn sum_bytes(conn: &Connection, range: &TimeRange) -> AppResult<BandwidthUsage> {
    // SQL SUM() raises on i64 overflow, so the totals are folded here
    let (sql, params) = build_filtered_query(
        "SELECT bytes_received, bytes_sent FROM events",
        range,
        None,
        None,
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(as_params(&params).as_slice(), |r| {
        Ok((r.get::<_, i64>(0)?, r.get::<_, i64>(1)?))
    })?;

    let mut usage = BandwidthUsage::default();
    for row in rows {
        let (received, sent) = row?;
        usage.download = usage.download.saturating_add(from_sql_int(received));
        usage.upload = usage.upload.saturating_add(from_sql_int(sent));
    }
    Ok(usage)
}

pub fn count_events(conn: &Connection, range: &TimeRange) -> AppResult<u64> {
    let (sql, params) = build_filtered_query("SELECT COUNT(*) FROM events", range, None, None);
    let mut stmt = conn.prepare_cached(&sql)?;
    let n: i64 = stmt.query_row(as_params(&params).as_slice(), |r| r.get(0))?;
    Ok(from_sql_int(n))
}

/// Delete events strictly older than `cutoff`. Returns rows deleted.
pub fn prune_before(conn: &Connection, cutoff: NaiveDateTime) -> AppResult<usize> {
    let n = conn.execute(
        "DELETE FROM events WHERE timestamp < ?1",
        [cutoff.format(TIMESTAMP_FORMAT).to_string()],
    )?;
    Ok(n)
}
