/// ANSI color helper utilities for terminal output.
use crate::models::attendance_status::AttendanceStatus;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Present → green, Late → yellow, Absent → red.
pub fn color_for_status(status: AttendanceStatus) -> &'static str {
    match status {
        AttendanceStatus::Present => GREEN,
        AttendanceStatus::Late => YELLOW,
        AttendanceStatus::Absent => RED,
    }
}

/// Grey out placeholders such as "--" or "N/A".
pub fn colorize_optional(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() || v == "--" || v == "N/A" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}

pub fn colorize_status(status: AttendanceStatus) -> String {
    format!("{}{}{}", color_for_status(status), status.to_db_str(), RESET)
}
