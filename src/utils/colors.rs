use crate::models::EventKind;

/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Connected → green, disconnected → red, session summaries → cyan.
pub fn color_for_kind(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Connected => GREEN,
        EventKind::Disconnected => RED,
        EventKind::SessionSummary => CYAN,
    }
}

/// Shade for a heatmap cell relative to the busiest cell.
pub fn heat_glyph(value: u64, max: u64) -> &'static str {
    if value == 0 || max == 0 {
        return "·";
    }
    match value * 4 / max {
        0 => "░",
        1 => "▒",
        2 => "▓",
        _ => "█",
    }
}
