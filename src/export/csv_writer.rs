// src/export/csv_writer.rs

use crate::errors::AppResult;
use crate::export::model::{AttendanceExport, HEADERS};
use csv::{QuoteStyle, WriterBuilder};
use std::path::Path;

/// Write `Name,Date,Time,Status` rows. Fields are never quoted, so a comma
/// inside a name ends up as an extra column.
pub(crate) fn export_csv(rows: &[AttendanceExport], path: &Path) -> AppResult<()> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .from_path(path)?;

    wtr.write_record(HEADERS)?;
    for r in rows {
        wtr.write_record(r.to_record())?;
    }

    wtr.flush()?;
    Ok(())
}
