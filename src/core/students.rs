use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::student::{NewStudent, Student, StudentUpdate};
use chrono::Local;
use rusqlite::{Connection, ErrorCode};

/// Registration and admin operations on the `students` table.
pub struct StudentLogic;

/// Trim free-text fields; blank optionals become `None`.
fn normalize(student: &NewStudent) -> AppResult<NewStudent> {
    let name = student.name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidName(student.name.clone()));
    }

    let clean = |v: &Option<String>| {
        v.as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    Ok(NewStudent {
        name: name.to_string(),
        email: clean(&student.email),
        student_id: clean(&student.student_id),
    })
}

/// Reject a name / student id already held by another student.
fn check_unique(
    conn: &Connection,
    name: Option<&str>,
    student_id: Option<&str>,
    exclude: Option<i64>,
) -> AppResult<()> {
    if let Some(n) = name
        && let Some(other) = queries::load_student_by_name(conn, n)?
        && Some(other.id) != exclude
    {
        return Err(AppError::DuplicateName(n.to_string()));
    }

    if let Some(sid) = student_id
        && let Some(other) = queries::load_student_by_student_id(conn, sid)?
        && Some(other.id) != exclude
    {
        return Err(AppError::DuplicateStudentId(sid.to_string()));
    }

    Ok(())
}

/// Translate a UNIQUE failure raised by SQLite into the matching domain error.
fn map_constraint(err: rusqlite::Error, name: &str, student_id: Option<&str>) -> AppError {
    if let rusqlite::Error::SqliteFailure(e, Some(msg)) = &err
        && e.code == ErrorCode::ConstraintViolation
    {
        if msg.contains("students.name") {
            return AppError::DuplicateName(name.to_string());
        }
        if msg.contains("students.student_id") {
            return AppError::DuplicateStudentId(student_id.unwrap_or_default().to_string());
        }
    }
    AppError::Db(err)
}

impl StudentLogic {
    /// Register a new student.
    ///
    /// Fails with `DuplicateName` / `DuplicateStudentId` when the name or the
    /// (non-empty) student id is already taken.
    pub fn add(pool: &mut DbPool, student: &NewStudent) -> AppResult<Student> {
        let student = normalize(student)?;
        let conn = &pool.conn;

        check_unique(
            conn,
            Some(&student.name),
            student.student_id.as_deref(),
            None,
        )?;

        let created_at = Local::now().to_rfc3339();
        let id = queries::insert_student(conn, &student, &created_at)
            .map_err(|e| map_constraint(e, &student.name, student.student_id.as_deref()))?;

        audit(
            conn,
            "add",
            &student.name,
            &format!("Registered student #{id}"),
        );

        queries::load_student(conn, id)?
            .ok_or_else(|| AppError::StudentNotFound(format!("#{id}")))
    }

    pub fn get(pool: &DbPool, id: i64) -> AppResult<Student> {
        queries::load_student(&pool.conn, id)?
            .ok_or_else(|| AppError::StudentNotFound(format!("#{id}")))
    }

    pub fn find_by_name(pool: &DbPool, name: &str) -> AppResult<Option<Student>> {
        Ok(queries::load_student_by_name(&pool.conn, name)?)
    }

    /// All students ordered by name.
    pub fn list(pool: &DbPool) -> AppResult<Vec<Student>> {
        Ok(queries::load_students(&pool.conn)?)
    }

    /// Exact name first, then the first case-insensitive match in name order.
    pub fn find_matching(pool: &DbPool, name: &str) -> AppResult<Option<Student>> {
        if let Some(s) = queries::load_student_by_name(&pool.conn, name)? {
            return Ok(Some(s));
        }
        Ok(queries::load_students(&pool.conn)?
            .into_iter()
            .find(|s| s.name_matches(name)))
    }

    /// Resolve a CLI key to a student.
    ///
    /// `#12` is always an id. Any other key is a name (exact, then
    /// case-insensitive); a bare number falls back to the id only when no
    /// student carries that name.
    pub fn lookup(pool: &DbPool, key: &str) -> AppResult<Student> {
        let key = key.trim();
        let not_found = || AppError::StudentNotFound(key.to_string());

        if let Some(raw) = key.strip_prefix('#') {
            let id = raw.parse::<i64>().map_err(|_| not_found())?;
            return queries::load_student(&pool.conn, id)?.ok_or_else(not_found);
        }

        if let Some(s) = Self::find_matching(pool, key)? {
            return Ok(s);
        }

        match key.parse::<i64>() {
            Ok(id) => queries::load_student(&pool.conn, id)?.ok_or_else(not_found),
            Err(_) => Err(not_found()),
        }
    }

    /// Admin edit of an existing student.
    pub fn update(pool: &mut DbPool, id: i64, upd: &StudentUpdate) -> AppResult<Student> {
        if upd.is_empty() {
            return Err(AppError::NoUpdates);
        }

        let conn = &pool.conn;
        let current = queries::load_student(conn, id)?
            .ok_or_else(|| AppError::StudentNotFound(format!("#{id}")))?;

        let name = match &upd.name {
            Some(n) if n.trim().is_empty() => return Err(AppError::InvalidName(n.clone())),
            Some(n) => Some(n.trim().to_string()),
            None => None,
        };
        let student_id = upd
            .student_id
            .as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        check_unique(conn, name.as_deref(), student_id.as_deref(), Some(id))?;

        let clean = StudentUpdate {
            name: name.clone(),
            email: upd.email.as_ref().map(|e| e.trim().to_string()),
            student_id: upd.student_id.as_ref().map(|s| s.trim().to_string()),
            status: upd.status,
        };

        queries::update_student(conn, id, &clean).map_err(|e| {
            map_constraint(
                e,
                name.as_deref().unwrap_or(&current.name),
                student_id.as_deref(),
            )
        })?;

        audit(conn, "edit", &current.name, &format!("Updated student #{id}"));

        Self::get(pool, id)
    }

    /// Delete a student and all of its attendance in one transaction.
    /// Returns the number of attendance rows removed.
    pub fn delete(pool: &mut DbPool, id: i64) -> AppResult<usize> {
        let student = Self::get(pool, id)?;

        let removed = pool.transaction(|tx| {
            let removed = queries::delete_attendance_for_student(tx, id)?;
            let deleted = queries::delete_student_row(tx, id)?;
            if deleted == 0 {
                return Err(AppError::StudentNotFound(format!("#{id}")));
            }
            Ok(removed)
        })?;

        audit(
            &pool.conn,
            "del",
            &student.name,
            &format!("Deleted student #{id} and {removed} attendance records"),
        );

        Ok(removed)
    }
}
