//! Log Ingestor: source lines → parser → Event Store.

use crate::core::parser;
use crate::core::source::LogSource;
use crate::db::{EventStore, InsertOutcome};
use crate::errors::{AppError, AppResult};
use crate::models::{EventOrigin, IngestReport};
use crate::ui::messages::warning;

pub struct Ingestor<'a> {
    store: &'a dyn EventStore,
}

/// Result of ingesting several sources in one cycle.
#[derive(Debug, Default)]
pub struct CycleIngest {
    pub report: IngestReport,
    /// `(source name, reason)` for every source that could not be read.
    pub unavailable: Vec<(String, String)>,
}

impl<'a> Ingestor<'a> {
    pub fn new(store: &'a dyn EventStore) -> Self {
        Self { store }
    }

    /// Read `source` to its current end and commit every new event.
    ///
    /// Only an unreadable source is an error; bad lines and failed writes are
    /// counted in the report and processing continues.
    pub fn ingest(&self, source: &mut dyn LogSource) -> AppResult<IngestReport> {
        let lines = source.read_lines()?;
        let report = self.ingest_lines(&lines, source.origin());

        if report.events_inserted > 0 || report.parse_failures > 0 || report.store_failures > 0 {
            let msg = format!(
                "lines={} inserted={} duplicate={} parse_failures={} store_failures={}",
                report.lines_read,
                report.events_inserted,
                report.events_duplicate,
                report.parse_failures,
                report.store_failures
            );
            if let Err(e) = self.store.record_log("ingest", &source.name(), &msg) {
                warning(format!("Failed to write internal log: {}", e));
            }
        }

        Ok(report)
    }

    /// Parse and store already-read lines.
    pub fn ingest_lines<S: AsRef<str>>(&self, lines: &[S], origin: EventOrigin) -> IngestReport {
        let mut report = IngestReport::default();
        let mut last_store_error: Option<AppError> = None;

        for raw in lines {
            report.lines_read += 1;
            let line = raw.as_ref();
            if line.trim().is_empty() {
                continue;
            }

            let event = match parser::parse(line) {
                Ok(ev) => ev.with_origin(origin),
                Err(_) => {
                    report.parse_failures += 1;
                    continue;
                }
            };
            report.events_parsed += 1;

            match self.store.insert(&event) {
                Ok(InsertOutcome::Inserted) => report.events_inserted += 1,
                Ok(InsertOutcome::Duplicate) => report.events_duplicate += 1,
                Err(e) => {
                    report.store_failures += 1;
                    last_store_error = Some(e);
                }
            }
        }

        if let Some(e) = last_store_error {
            warning(format!(
                "{} event(s) could not be stored (last error: {})",
                report.store_failures, e
            ));
        }

        report
    }

    /// Ingest every source; one unreadable source does not stop the others.
    pub fn ingest_all(&self, sources: &mut [Box<dyn LogSource>]) -> CycleIngest {
        let mut cycle = CycleIngest::default();

        for source in sources.iter_mut() {
            match self.ingest(source.as_mut()) {
                Ok(r) => cycle.report += &r,
                Err(AppError::SourceUnavailable {
                    source_name,
                    reason,
                }) => cycle.unavailable.push((source_name, reason)),
                Err(e) => cycle.unavailable.push((source.name(), e.to_string())),
            }
        }

        cycle
    }
}
