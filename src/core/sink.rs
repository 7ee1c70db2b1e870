//! Push channel: each monitor cycle publishes a [`MetricsUpdate`].

use crate::errors::AppResult;
use crate::models::{IngestReport, Metrics};
use crate::utils::colors::{CYAN, GREEN, RESET, YELLOW};
use crate::utils::formatting::format_bytes;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::io::Write;

/// Health of the log sources, surfaced to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SourceStatus {
    Ok,
    /// At least one source has been unreadable for several cycles in a row.
    Degraded {
        consecutive_failures: u32,
        sources: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsUpdate {
    pub generated_at: NaiveDateTime,
    pub metrics: Metrics,
    pub report: IngestReport,
    pub status: SourceStatus,
    /// False when the metrics are carried over from an earlier cycle.
    pub fresh: bool,
}

pub trait MetricsSink {
    fn publish(&mut self, update: &MetricsUpdate) -> AppResult<()>;
}

/// One human-readable line per update.
pub struct ConsoleSink;

impl MetricsSink for ConsoleSink {
    fn publish(&mut self, update: &MetricsUpdate) -> AppResult<()> {
        let m = &update.metrics;
        let status = match &update.status {
            SourceStatus::Ok => format!("{GREEN}ok{RESET}"),
            SourceStatus::Degraded {
                consecutive_failures,
                ..
            } => format!("{YELLOW}degraded ({consecutive_failures} cycles){RESET}"),
        };
        println!(
            "{CYAN}{}{RESET} | active: {} | ↓ {} | ↑ {} | events: {} (+{}) | sources: {}",
            update.generated_at.format("%Y-%m-%d %H:%M:%S"),
            m.active_users,
            format_bytes(m.bandwidth_usage.download),
            format_bytes(m.bandwidth_usage.upload),
            m.total_connections,
            update.report.events_inserted,
            status
        );
        Ok(())
    }
}

/// Newline-delimited JSON, suitable for piping into a socket bridge.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MetricsSink for JsonLinesSink<W> {
    fn publish(&mut self, update: &MetricsUpdate) -> AppResult<()> {
        serde_json::to_writer(&mut self.out, update)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}
