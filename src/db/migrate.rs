use crate::ui::messages::{success, warning};
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Check whether a migration marker is already present in the `log` table.
fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_migration(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Create the `students` table.
fn create_students_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT UNIQUE NOT NULL,
            email       TEXT,
            student_id  TEXT UNIQUE,
            created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            status      TEXT NOT NULL DEFAULT 'active'
        );
        "#,
    )?;
    Ok(())
}

/// Create the `attendance` table: at most one row per (student, date).
fn create_attendance_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS attendance (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id  INTEGER NOT NULL,
            date        TEXT NOT NULL,
            time_in     TEXT,
            status      TEXT NOT NULL DEFAULT 'present',
            created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (student_id) REFERENCES students(id),
            UNIQUE(student_id, date)
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance(date);
        "#,
    )?;
    Ok(())
}

/// Databases written by the first desktop release stored '' for a missing
/// student id or email. Under `UNIQUE(student_id)` a second student without
/// an id could not be registered, so blanks become NULL.
fn migrate_blank_identifiers(conn: &Connection) -> Result<()> {
    let version = "20250301_0002_blank_identifiers_to_null";

    if migration_applied(conn, version)? {
        return Ok(());
    }

    let ids = conn.execute(
        "UPDATE students SET student_id = NULL WHERE TRIM(student_id) = ''",
        [],
    )?;
    let emails = conn.execute("UPDATE students SET email = NULL WHERE TRIM(email) = ''", [])?;

    mark_migration(
        conn,
        version,
        &format!("Normalized {ids} blank student ids and {emails} blank emails"),
    )?;

    if ids + emails > 0 {
        success(format!(
            "Migration applied: {} → {} blank student ids, {} blank emails set to NULL",
            version, ids, emails
        ));
    }

    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Called by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Students first: attendance references it
    let legacy = table_exists(conn, "students")?;
    create_students_table(conn)?;
    create_attendance_table(conn)?;

    // 3) Data fixes for databases created by older releases
    if legacy && !migration_applied(conn, "20250301_0002_blank_identifiers_to_null")? {
        warning("Existing students table detected, checking for blank identifiers...");
    }
    migrate_blank_identifiers(conn)?;

    Ok(())
}
