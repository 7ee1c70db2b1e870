use super::model::EventExport;
use super::{ExportFormat, csv, json, notify_export_success};
use crate::errors::AppResult;
use crate::models::Event;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Write `events` to `path` in the requested format.
    pub fn export(events: &[Event], format: ExportFormat, path: &Path) -> AppResult<usize> {
        let rows: Vec<EventExport> = events.iter().map(EventExport::from).collect();

        match format {
            ExportFormat::Csv => csv::write_csv(path, &rows)?,
            ExportFormat::Json => json::write_json(path, &rows)?,
        }

        notify_export_success(format.as_str(), rows.len(), path);
        Ok(rows.len())
    }
}
