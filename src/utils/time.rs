//! Time utilities: parsing HH:MM[:SS], current clock time.

use crate::errors::{AppError, AppResult};
use chrono::{NaiveTime, Timelike};

/// Parse user input: `HH:MM:SS` or `HH:MM`.
pub fn parse_time(t: &str) -> Option<NaiveTime> {
    let t = t.trim();
    NaiveTime::parse_from_str(t, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
        .ok()
}

/// Parse a stored `time_in` value (same formats as user input).
pub fn parse_db_time(t: &str) -> Option<NaiveTime> {
    parse_time(t)
}

pub fn parse_optional_time(input: Option<&String>) -> AppResult<Option<NaiveTime>> {
    if let Some(s) = input {
        let t = parse_time(s).ok_or_else(|| AppError::InvalidTime(s.to_string()))?;
        Ok(Some(t))
    } else {
        Ok(None)
    }
}

/// Local wall-clock time truncated to whole seconds.
pub fn now() -> NaiveTime {
    let t = chrono::Local::now().time();
    t.with_nanosecond(0).unwrap_or(t)
}
