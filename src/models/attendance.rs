use super::attendance_status::AttendanceStatus;
use crate::errors::{AppError, AppResult};
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceEvent {
    pub id: i64,
    pub student_id: i64,           // ⇔ attendance.student_id (FK students.id)
    pub date: NaiveDate,           // ⇔ attendance.date (TEXT "YYYY-MM-DD")
    pub time_in: Option<NaiveTime>, // ⇔ attendance.time_in (TEXT "HH:MM:SS")
    pub status: AttendanceStatus,  // ⇔ attendance.status
    pub created_at: String,        // ⇔ attendance.created_at (TEXT, ISO8601)
}

impl AttendanceEvent {
    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// `HH:MM:SS`, or `N/A` when no time was recorded.
    pub fn time_str(&self) -> String {
        self.time_in
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }
}

/// Result of a strict marking attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkOutcome {
    Recorded(AttendanceEvent),
    AlreadyMarked(AttendanceEvent),
}

impl MarkOutcome {
    pub fn event(&self) -> &AttendanceEvent {
        match self {
            MarkOutcome::Recorded(ev) | MarkOutcome::AlreadyMarked(ev) => ev,
        }
    }

    pub fn is_recorded(&self) -> bool {
        matches!(self, MarkOutcome::Recorded(_))
    }

    /// Strict form: a pre-existing event becomes `AppError::AlreadyMarked`.
    pub fn into_result(self, student_name: &str) -> AppResult<AttendanceEvent> {
        match self {
            MarkOutcome::Recorded(ev) => Ok(ev),
            MarkOutcome::AlreadyMarked(ev) => Err(AppError::AlreadyMarked {
                name: student_name.to_string(),
                date: ev.date_str(),
                time: ev.time_str(),
            }),
        }
    }
}
