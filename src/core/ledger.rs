use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceEvent, MarkOutcome};
use crate::models::attendance_status::AttendanceStatus;
use crate::models::student::Student;
use crate::models::summary::{AttendanceSummary, DailyRow};
use crate::ui::messages::warning;
use chrono::{Local, NaiveDate, NaiveTime};

/// Daily attendance ledger: one event per (student, date).
pub struct AttendanceLogic;

impl AttendanceLogic {
    /// Strict marking: record the event unless one already exists for the day.
    ///
    /// An existing event is returned untouched as `MarkOutcome::AlreadyMarked`.
    pub fn mark(
        pool: &mut DbPool,
        student: &Student,
        date: NaiveDate,
        time: Option<NaiveTime>,
        status: AttendanceStatus,
    ) -> AppResult<MarkOutcome> {
        let outcome = pool.transaction(|tx| {
            if queries::load_student(tx, student.id)?.is_none() {
                return Err(AppError::StudentNotFound(student.name.clone()));
            }

            if let Some(existing) = queries::load_attendance(tx, student.id, &date)? {
                return Ok(MarkOutcome::AlreadyMarked(existing));
            }

            let created_at = Local::now().to_rfc3339();
            queries::insert_attendance(tx, student.id, &date, time, status, &created_at)?;

            let stored = queries::load_attendance(tx, student.id, &date)?
                .ok_or_else(|| AppError::Other("attendance row vanished after insert".into()))?;
            Ok(MarkOutcome::Recorded(stored))
        })?;

        if let MarkOutcome::Recorded(ev) = &outcome {
            audit(
                &pool.conn,
                "mark",
                &student.name,
                &format!("{} {} {}", ev.date_str(), ev.time_str(), ev.status.to_db_str()),
            );
        }

        Ok(outcome)
    }

    /// Overwrite path: insert or replace the event for (student, date).
    pub fn force_mark(
        pool: &mut DbPool,
        student: &Student,
        date: NaiveDate,
        time: Option<NaiveTime>,
        status: AttendanceStatus,
    ) -> AppResult<AttendanceEvent> {
        let stored = pool.transaction(|tx| {
            if queries::load_student(tx, student.id)?.is_none() {
                return Err(AppError::StudentNotFound(student.name.clone()));
            }

            let created_at = Local::now().to_rfc3339();
            queries::upsert_attendance(tx, student.id, &date, time, status, &created_at)?;

            queries::load_attendance(tx, student.id, &date)?
                .ok_or_else(|| AppError::Other("attendance row vanished after upsert".into()))
        })?;

        audit(
            &pool.conn,
            "force",
            &student.name,
            &format!(
                "{} {} {}",
                stored.date_str(),
                stored.time_str(),
                stored.status.to_db_str()
            ),
        );

        Ok(stored)
    }

    /// Existing event for (student, date), if any.
    pub fn check(pool: &DbPool, student: &Student, date: NaiveDate) -> AppResult<Option<AttendanceEvent>> {
        Ok(queries::load_attendance(&pool.conn, student.id, &date)?)
    }

    /// Events of one student, newest first, optionally capped.
    pub fn history(
        pool: &DbPool,
        student: &Student,
        limit: Option<usize>,
    ) -> AppResult<Vec<AttendanceEvent>> {
        let limit = limit.map(|n| i64::try_from(n).unwrap_or(i64::MAX));
        Ok(queries::load_attendance_by_student(
            &pool.conn, student.id, limit,
        )?)
    }

    /// Status → count for one student. Statuses never recorded count 0;
    /// rows with an unrecognised status are reported and left out.
    pub fn summarize(pool: &DbPool, student: &Student) -> AppResult<AttendanceSummary> {
        let mut summary = AttendanceSummary::default();

        for (status_str, count) in queries::count_by_status(&pool.conn, student.id)? {
            let Some(status) = AttendanceStatus::from_db_str(&status_str) else {
                warning(format!(
                    "{count} attendance records of {} have unknown status '{status_str}' and are not counted",
                    student.name
                ));
                continue;
            };
            let count = u32::try_from(count).unwrap_or(u32::MAX);
            *summary.counts.entry(status).or_insert(0) += count;
        }

        Ok(summary)
    }

    /// One row per registered student for `date`, with the event if present.
    pub fn daily(pool: &DbPool, date: NaiveDate) -> AppResult<Vec<DailyRow>> {
        Ok(queries::load_daily(&pool.conn, &date)?)
    }
}
