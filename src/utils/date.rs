use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// `None` → today, otherwise a strict `YYYY-MM-DD` date.
pub fn parse_date_or_today(input: Option<&String>) -> AppResult<NaiveDate> {
    match input {
        None => Ok(today()),
        Some(s) => parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string())),
    }
}
