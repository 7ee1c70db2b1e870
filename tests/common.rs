#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDateTime;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Binary under test, with HOME pointed at a scratch directory so that no
/// user configuration leaks into the run.
pub fn wgm() -> Command {
    let mut home = env::temp_dir();
    home.push("wgmonitor_test_home");
    fs::create_dir_all(&home).ok();

    let mut cmd = cargo_bin_cmd!("wgmonitor");
    cmd.env("HOME", home);
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_wgmonitor.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    for suffix in ["", "-wal", "-shm"] {
        fs::remove_file(format!("{db_path}{suffix}")).ok();
    }
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Write `lines` (newline-terminated) to a fresh log file and return its path.
pub fn write_log(name: &str, lines: &[&str]) -> String {
    let path = temp_out(name, "log");
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&path, content).expect("write log file");
    path
}

pub fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("valid timestamp")
}

/// Small gateway log used by several tests.
pub const SAMPLE_LINES: [&str; 3] = [
    "2025-03-01 10:15:00 alice connected",
    "2025-03-01 12:40:00 alice SESSION_END duration:2h25m download:1.5 MB upload:0.25 MB",
    "2025-03-01 12:40:00 alice disconnected",
];
