// src/export/logic.rs

use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::csv_writer::export_csv;
use crate::export::fs_utils::prepare_output;
use crate::export::json_writer::export_json;
use crate::export::model::AttendanceExport;
use crate::export::{ExportFormat, notify_export_success};
use crate::models::student::Student;
use crate::ui::messages::warning;
use rusqlite::{Connection, Row, params};
use std::path::Path;

/// High-level export logic.
pub struct ExportLogic;

impl ExportLogic {
    /// Export attendance records.
    ///
    /// - `student`: `Some` exports one student's history, `None` every record
    /// - rows are ordered newest first
    ///
    /// Returns the number of rows written.
    pub fn export(
        pool: &mut DbPool,
        format: ExportFormat,
        file: &str,
        student: Option<&Student>,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        prepare_output(path, force)?;

        let rows = load_rows(&pool.conn, student.map(|s| s.id))?;

        if rows.is_empty() {
            warning("No attendance records found, writing header only.");
        }

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        audit(
            &pool.conn,
            "export",
            format.as_str(),
            &format!("{} records → {}", rows.len(), path.display()),
        );

        notify_export_success(&format.as_str().to_uppercase(), rows.len(), path);
        Ok(rows.len())
    }
}

fn map_export_row(row: &Row) -> rusqlite::Result<AttendanceExport> {
    let time: Option<String> = row.get("time_in")?;
    Ok(AttendanceExport {
        name: row.get("name")?,
        date: row.get("date")?,
        time: time
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "N/A".to_string()),
        status: row.get("status")?,
    })
}

fn load_rows(conn: &Connection, student_id: Option<i64>) -> AppResult<Vec<AttendanceExport>> {
    let mut stmt = conn.prepare(
        "SELECT s.name, a.date, a.time_in, a.status
         FROM attendance a
         JOIN students s ON s.id = a.student_id
         WHERE ?1 IS NULL OR a.student_id = ?1
         ORDER BY a.date DESC, a.time_in DESC, s.name ASC",
    )?;

    let rows = stmt.query_map(params![student_id], map_export_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
