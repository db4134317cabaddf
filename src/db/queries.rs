use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceEvent;
use crate::models::attendance_status::AttendanceStatus;
use crate::models::student::{NewStudent, Student, StudentUpdate};
use crate::models::student_status::StudentStatus;
use crate::models::summary::DailyRow;
use crate::utils::time::parse_db_time;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const STUDENT_COLUMNS: &str = "id, name, email, student_id, status, created_at";
const ATTENDANCE_COLUMNS: &str = "id, student_id, date, time_in, status, created_at";

fn conversion_error(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, Type::Text, Box::new(err))
}

/// Legacy rows may hold '' instead of NULL.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn date_param(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn time_param(time: Option<NaiveTime>) -> Option<String> {
    time.map(|t| t.format("%H:%M:%S").to_string())
}

// ---------------------------------------------------------------------------
// students
// ---------------------------------------------------------------------------

pub fn map_student(row: &Row) -> Result<Student> {
    let status_str: String = row.get("status")?;
    let status = StudentStatus::from_db_str(&status_str)
        .ok_or_else(|| conversion_error(4, AppError::Other(format!("Invalid student status: {status_str}"))))?;

    Ok(Student {
        id: row.get("id")?,
        name: row.get("name")?,
        email: non_blank(row.get("email")?),
        student_id: non_blank(row.get("student_id")?),
        status,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_student(conn: &Connection, student: &NewStudent, created_at: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO students (name, email, student_id, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            student.name,
            student.email,
            student.student_id,
            StudentStatus::Active.to_db_str(),
            created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_student(conn: &Connection, id: i64) -> Result<Option<Student>> {
    let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?1");
    conn.query_row(&sql, [id], map_student).optional()
}

/// Exact (case-sensitive) lookup by name.
pub fn load_student_by_name(conn: &Connection, name: &str) -> Result<Option<Student>> {
    let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE name = ?1");
    conn.query_row(&sql, [name], map_student).optional()
}

pub fn load_student_by_student_id(conn: &Connection, student_id: &str) -> Result<Option<Student>> {
    let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE student_id = ?1");
    conn.query_row(&sql, [student_id], map_student).optional()
}

/// All students ordered by name.
pub fn load_students(conn: &Connection) -> Result<Vec<Student>> {
    let sql = format!("SELECT {STUDENT_COLUMNS} FROM students ORDER BY name ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_student)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Update only the provided fields. Returns the number of rows touched.
pub fn update_student(conn: &Connection, id: i64, upd: &StudentUpdate) -> Result<usize> {
    let mut sets: Vec<&str> = Vec::new();
    let mut values: Vec<Option<String>> = Vec::new();

    if let Some(name) = &upd.name {
        sets.push("name = ?");
        values.push(Some(name.clone()));
    }
    if let Some(email) = &upd.email {
        sets.push("email = ?");
        values.push(non_blank(Some(email.clone())));
    }
    if let Some(sid) = &upd.student_id {
        sets.push("student_id = ?");
        values.push(non_blank(Some(sid.clone())));
    }
    if let Some(status) = &upd.status {
        sets.push("status = ?");
        values.push(Some(status.to_db_str().to_string()));
    }

    if sets.is_empty() {
        return Ok(0);
    }

    let sql = format!("UPDATE students SET {} WHERE id = ?", sets.join(", "));

    let mut params: Vec<&dyn rusqlite::ToSql> = values
        .iter()
        .map(|v| v as &dyn rusqlite::ToSql)
        .collect();
    params.push(&id);

    conn.execute(&sql, rusqlite::params_from_iter(params))
}

pub fn delete_student_row(conn: &Connection, id: i64) -> Result<usize> {
    conn.execute("DELETE FROM students WHERE id = ?1", [id])
}

// ---------------------------------------------------------------------------
// attendance
// ---------------------------------------------------------------------------

pub fn map_attendance(row: &Row) -> Result<AttendanceEvent> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_error(2, AppError::InvalidDate(date_str.clone())))?;

    let time_str: Option<String> = non_blank(row.get("time_in")?);
    let time_in = match time_str {
        Some(t) => Some(parse_db_time(&t).ok_or_else(|| conversion_error(3, AppError::InvalidTime(t.clone())))?),
        None => None,
    };

    let status_str: String = row.get("status")?;
    let status = AttendanceStatus::from_db_str(&status_str)
        .ok_or_else(|| conversion_error(4, AppError::InvalidStatus(status_str.clone())))?;

    Ok(AttendanceEvent {
        id: row.get("id")?,
        student_id: row.get("student_id")?,
        date,
        time_in,
        status,
        created_at: row.get("created_at")?,
    })
}

pub fn load_attendance(
    conn: &Connection,
    student_id: i64,
    date: &NaiveDate,
) -> Result<Option<AttendanceEvent>> {
    let sql = format!(
        "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE student_id = ?1 AND date = ?2"
    );
    conn.query_row(&sql, params![student_id, date_param(date)], map_attendance)
        .optional()
}

/// Plain insert: fails on the (student_id, date) unique constraint.
pub fn insert_attendance(
    conn: &Connection,
    student_id: i64,
    date: &NaiveDate,
    time_in: Option<NaiveTime>,
    status: AttendanceStatus,
    created_at: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO attendance (student_id, date, time_in, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            student_id,
            date_param(date),
            time_param(time_in),
            status.to_db_str(),
            created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Insert-or-replace keyed by (student_id, date). The row id is kept on conflict.
pub fn upsert_attendance(
    conn: &Connection,
    student_id: i64,
    date: &NaiveDate,
    time_in: Option<NaiveTime>,
    status: AttendanceStatus,
    created_at: &str,
) -> Result<()> {
    conn.execute(
        "INSERT INTO attendance (student_id, date, time_in, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(student_id, date) DO UPDATE SET
             time_in = excluded.time_in,
             status = excluded.status,
             created_at = excluded.created_at",
        params![
            student_id,
            date_param(date),
            time_param(time_in),
            status.to_db_str(),
            created_at,
        ],
    )?;
    Ok(())
}

pub fn delete_attendance_for_student(conn: &Connection, student_id: i64) -> Result<usize> {
    conn.execute("DELETE FROM attendance WHERE student_id = ?1", [student_id])
}

/// Events of one student, newest first. `limit = None` returns everything.
pub fn load_attendance_by_student(
    conn: &Connection,
    student_id: i64,
    limit: Option<i64>,
) -> Result<Vec<AttendanceEvent>> {
    let sql = format!(
        "SELECT {ATTENDANCE_COLUMNS} FROM attendance
         WHERE student_id = ?1
         ORDER BY date DESC, time_in DESC
         LIMIT ?2"
    );

    // SQLite treats a negative LIMIT as "no limit"
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![student_id, limit.unwrap_or(-1)], map_attendance)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Raw `status → count` rows for one student.
pub fn count_by_status(conn: &Connection, student_id: i64) -> Result<Vec<(String, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT status, COUNT(*) FROM attendance
         WHERE student_id = ?1
         GROUP BY status",
    )?;
    let rows = stmt.query_map([student_id], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Every student paired with the event of `date`, if any (LEFT JOIN).
pub fn load_daily(conn: &Connection, date: &NaiveDate) -> Result<Vec<DailyRow>> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.name, s.email, s.student_id, s.status, s.created_at,
                a.id         AS a_id,
                a.date       AS a_date,
                a.time_in    AS a_time_in,
                a.status     AS a_status,
                a.created_at AS a_created_at
         FROM students s
         LEFT JOIN attendance a ON a.student_id = s.id AND a.date = ?1
         ORDER BY s.name ASC",
    )?;

    let rows = stmt.query_map([date_param(date)], |row| {
        let student = map_student(row)?;

        let event_id: Option<i64> = row.get("a_id")?;
        let event = match event_id {
            None => None,
            Some(id) => {
                let time_str: Option<String> = non_blank(row.get("a_time_in")?);
                let time_in = match time_str {
                    Some(t) => Some(
                        parse_db_time(&t)
                            .ok_or_else(|| conversion_error(8, AppError::InvalidTime(t.clone())))?,
                    ),
                    None => None,
                };
                let status_str: String = row.get("a_status")?;
                let status = AttendanceStatus::from_db_str(&status_str)
                    .ok_or_else(|| conversion_error(9, AppError::InvalidStatus(status_str.clone())))?;

                Some(AttendanceEvent {
                    id,
                    student_id: student.id,
                    date: *date,
                    time_in,
                    status,
                    created_at: row.get("a_created_at")?,
                })
            }
        };

        Ok(DailyRow { student, event })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Count of attendance rows referencing a student (used after deletes).
pub fn count_attendance_for_student(conn: &Connection, student_id: i64) -> AppResult<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM attendance WHERE student_id = ?1",
        [student_id],
        |row| row.get(0),
    )?;
    Ok(n)
}
