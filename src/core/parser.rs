//! Log line parser.
//!
//! Two grammars are recognized, tried in this order:
//!
//! ```text
//! 2025-03-01 10:15:00 alice connected
//! 2025-03-01 12:40:00 alice SESSION_END duration:2h25m download:1.5 MB upload:0.25 MB
//! ```
//!
//! The first grammar whose pattern matches the whole line wins. Parsing is pure:
//! no I/O and no shared mutable state.

use crate::errors::ParseFailure;
use crate::models::event::TIMESTAMP_FORMAT;
use crate::models::{Event, EventKind};
use chrono::{NaiveDateTime, TimeDelta};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// 1 MB in the source logs is a binary megabyte.
pub const BYTES_PER_MB: f64 = 1_048_576.0;

static CONNECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})[ \t]+([A-Za-z0-9_.@-]+)[ \t]+(connected|disconnected)$",
    )
    .expect("valid connection regex")
});

static SESSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})[ \t]+([A-Za-z0-9_.@-]+)[ \t]+SESSION_END[ \t]+(?:duration|durée):([^\s:]+)h([^\s:]+)m[ \t]+download:(\S+)[ \t]+MB[ \t]+upload:(\S+)[ \t]+MB$",
    )
    .expect("valid session summary regex")
});

type Grammar = fn(&str) -> Option<Result<Event, ParseFailure>>;

/// Grammars in priority order.
const GRAMMARS: [Grammar; 2] = [parse_connection, parse_session_summary];

/// Parse one raw log line into an event.
pub fn parse(line: &str) -> Result<Event, ParseFailure> {
    let line = line.trim_end();
    GRAMMARS
        .iter()
        .find_map(|grammar| grammar(line))
        .unwrap_or(Err(ParseFailure::NoMatch))
}

fn parse_connection(line: &str) -> Option<Result<Event, ParseFailure>> {
    CONNECTION_RE.captures(line).map(|caps| connection_event(&caps))
}

fn connection_event(caps: &Captures) -> Result<Event, ParseFailure> {
    let timestamp = parse_timestamp(&caps[1])?;
    let kind = match &caps[3] {
        "connected" => EventKind::Connected,
        _ => EventKind::Disconnected,
    };
    Ok(Event::connection(timestamp, &caps[2], kind))
}

fn parse_session_summary(line: &str) -> Option<Result<Event, ParseFailure>> {
    SESSION_RE.captures(line).map(|caps| session_event(&caps))
}

fn session_event(caps: &Captures) -> Result<Event, ParseFailure> {
    let timestamp = parse_timestamp(&caps[1])?;
    let hours = parse_whole("duration_hours", &caps[3])?;
    let minutes = parse_whole("duration_minutes", &caps[4])?;
    let bytes_received = mb_to_bytes("download", &caps[5])?;
    let bytes_sent = mb_to_bytes("upload", &caps[6])?;
    let duration = TimeDelta::hours(hours) + TimeDelta::minutes(minutes);
    Ok(Event::session_summary(
        timestamp,
        &caps[2],
        bytes_received,
        bytes_sent,
        duration,
    ))
}

/// Parse the fixed `YYYY-MM-DD HH:MM:SS` format as naive local time.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, ParseFailure> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map_err(|_| ParseFailure::BadTimestamp(raw.to_string()))
}

fn parse_whole(field: &'static str, raw: &str) -> Result<i64, ParseFailure> {
    raw.parse::<u32>()
        .map(i64::from)
        .map_err(|_| ParseFailure::BadNumericField {
            field,
            value: raw.to_string(),
        })
}

/// Largest byte count an event can carry; matches the signed 64-bit column
/// the store writes it to.
pub const MAX_EVENT_BYTES: u64 = i64::MAX as u64;

/// Convert a (possibly fractional) MB amount to a rounded byte count.
pub fn mb_to_bytes(field: &'static str, raw: &str) -> Result<u64, ParseFailure> {
    let bad = || ParseFailure::BadNumericField {
        field,
        value: raw.to_string(),
    };
    let mb: f64 = raw.parse().map_err(|_| bad())?;
    let bytes = (mb * BYTES_PER_MB).round();
    // i64::MAX is not representable as f64; the cast rounds it up to 2^63
    if !bytes.is_finite() || bytes < 0.0 || bytes >= MAX_EVENT_BYTES as f64 {
        return Err(bad());
    }
    Ok(bytes as u64)
}
