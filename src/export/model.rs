// src/export/model.rs

use serde::Serialize;

/// Flat attendance row shared by the CSV and JSON writers.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct AttendanceExport {
    pub name: String,
    pub date: String,
    pub time: String,
    pub status: String,
}

/// CSV header row.
pub(crate) const HEADERS: [&str; 4] = ["Name", "Date", "Time", "Status"];

impl AttendanceExport {
    pub(crate) fn to_record(&self) -> [&str; 4] {
        [&self.name, &self.date, &self.time, &self.status]
    }
}
