use super::model::EventExport;
use crate::errors::AppResult;
use std::path::Path;

/// Scrive gli eventi in JSON formattato.
pub fn write_json(path: &Path, rows: &[EventExport]) -> AppResult<()> {
    let json = serde_json::to_string_pretty(rows)?;
    std::fs::write(path, json)?;
    Ok(())
}
