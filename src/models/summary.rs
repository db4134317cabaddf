use super::attendance_status::AttendanceStatus;
use super::{attendance::AttendanceEvent, student::Student};
use std::collections::BTreeMap;

/// Per-status attendance counts for one student.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceSummary {
    pub counts: BTreeMap<AttendanceStatus, u32>,
}

impl AttendanceSummary {
    pub fn count(&self, status: AttendanceStatus) -> u32 {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    pub fn present(&self) -> u32 {
        self.count(AttendanceStatus::Present)
    }

    pub fn absent(&self) -> u32 {
        self.count(AttendanceStatus::Absent)
    }

    pub fn late(&self) -> u32 {
        self.count(AttendanceStatus::Late)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }
}

/// One row of the daily register: every student, with that day's event if any.
#[derive(Debug, Clone)]
pub struct DailyRow {
    pub student: Student,
    pub event: Option<AttendanceEvent>,
}
