//! Formatting utilities used for CLI and dashboard outputs.

use chrono::TimeDelta;

const BYTE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Human-readable byte count: divide by 1024 until the value drops below
/// 1024, always with two decimals. Anything past GB is shown in TB.
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    for unit in BYTE_UNITS {
        if value < 1024.0 {
            return format!("{value:.2} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.2} TB")
}

/// Session duration as `02h 25m`.
pub fn format_duration(d: TimeDelta) -> String {
    let mins = d.num_minutes().abs();
    format!("{:02}h {:02}m", mins / 60, mins % 60)
}

pub fn pad_right(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

pub fn pad_left(s: &str, width: usize) -> String {
    format!("{:>width$}", s, width = width)
}
