use super::model::EventExport;
use crate::errors::AppResult;
use csv::Writer;
use std::path::Path;

/// Scrive gli eventi in CSV nel file indicato.
pub fn write_csv(path: &Path, rows: &[EventExport]) -> AppResult<()> {
    let mut wtr = Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
