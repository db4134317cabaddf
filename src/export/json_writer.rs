// src/export/json_writer.rs

use crate::errors::AppResult;
use crate::export::model::AttendanceExport;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub(crate) fn export_json(rows: &[AttendanceExport], path: &Path) -> AppResult<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, rows)?;
    Ok(())
}
