use wgmonitor::core::parser::{mb_to_bytes, parse};
use wgmonitor::errors::ParseFailure;
use wgmonitor::models::{EventKind, EventOrigin};

mod common;
use common::ts;

#[test]
fn parses_connected_line_with_zero_bytes() {
    let ev = parse("2025-03-01 10:15:00 alice connected").expect("valid line");

    assert_eq!(ev.timestamp, ts("2025-03-01 10:15:00"));
    assert_eq!(ev.user, "alice");
    assert_eq!(ev.kind, EventKind::Connected);
    assert_eq!(ev.bytes_received, 0);
    assert_eq!(ev.bytes_sent, 0);
    assert_eq!(ev.duration, None);
    assert_eq!(ev.origin, EventOrigin::Log);
}

#[test]
fn parses_disconnected_line() {
    let ev = parse("2025-03-01 10:20:00 bob.home disconnected").expect("valid line");
    assert_eq!(ev.kind, EventKind::Disconnected);
    assert_eq!(ev.user, "bob.home");
}

#[test]
fn parses_session_summary_in_binary_megabytes() {
    let ev = parse(
        "2025-03-01 12:40:00 alice SESSION_END duration:2h25m download:1.5 MB upload:0.25 MB",
    )
    .expect("valid line");

    assert_eq!(ev.kind, EventKind::SessionSummary);
    assert_eq!(ev.bytes_received, 1_572_864);
    assert_eq!(ev.bytes_sent, 262_144);
    assert_eq!(ev.duration_secs(), Some(2 * 3600 + 25 * 60));
}

#[test]
fn accepts_french_duration_label() {
    let ev = parse("2025-03-01 12:40:00 carol SESSION_END durée:0h5m download:10 MB upload:1 MB")
        .expect("valid line");
    assert_eq!(ev.duration_secs(), Some(300));
    assert_eq!(ev.bytes_received, 10 * 1_048_576);
}

#[test]
fn tolerates_trailing_whitespace_and_carriage_return() {
    assert!(parse("2025-03-01 10:15:00 alice connected  \r").is_ok());
}

#[test]
fn impossible_date_is_bad_timestamp() {
    let err = parse("2025-02-30 10:00:00 alice connected").unwrap_err();
    assert_eq!(err, ParseFailure::BadTimestamp("2025-02-30 10:00:00".into()));
}

#[test]
fn unknown_format_is_no_match() {
    assert_eq!(parse("hello world").unwrap_err(), ParseFailure::NoMatch);
    assert_eq!(
        parse("2025-03-01 10:15:00 alice rekeyed").unwrap_err(),
        ParseFailure::NoMatch
    );
    assert_eq!(parse("").unwrap_err(), ParseFailure::NoMatch);
}

#[test]
fn non_numeric_amount_is_bad_numeric_field() {
    let err = parse(
        "2025-03-01 12:40:00 alice SESSION_END duration:1h0m download:abc MB upload:1 MB",
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ParseFailure::BadNumericField { field: "download", .. }
    ));
}

#[test]
fn non_numeric_duration_is_bad_numeric_field() {
    let err = parse(
        "2025-03-01 12:40:00 alice SESSION_END duration:xh10m download:1 MB upload:1 MB",
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ParseFailure::BadNumericField { field: "duration_hours", .. }
    ));
}

#[test]
fn megabytes_are_rounded_to_whole_bytes() {
    assert_eq!(mb_to_bytes("download", "1.5"), Ok(1_572_864));
    assert_eq!(mb_to_bytes("download", "0"), Ok(0));
    // 0.0000005 MB = 0.52 bytes
    assert_eq!(mb_to_bytes("download", "0.0000005"), Ok(1));
    assert!(mb_to_bytes("upload", "-1").is_err());
    assert!(mb_to_bytes("upload", "NaN").is_err());
}

#[test]
fn amounts_beyond_storable_range_are_rejected() {
    // 10^13 MB is about 1.05e19 bytes, past i64::MAX
    let err = parse(
        "2025-03-01 12:40:00 alice SESSION_END duration:1h0m download:10000000000000 MB upload:1 MB",
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ParseFailure::BadNumericField { field: "download", .. }
    ));

    // 8 * 10^12 MB is about 8.4e18 bytes, still storable
    assert_eq!(
        mb_to_bytes("upload", "8000000000000"),
        Ok(8_000_000_000_000 * 1_048_576)
    );
}
