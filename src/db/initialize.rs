use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use crate::ui::messages::warning;
use rusqlite::Connection;

/// Bring the schema up to date, then report attendance rows whose student
/// no longer exists. Older databases were written without foreign key
/// enforcement, so such rows can predate this release.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    run_pending_migrations(conn)?;

    let orphans = orphaned_attendance(conn)?;
    if orphans > 0 {
        warning(format!(
            "{orphans} attendance records reference a deleted student and are ignored by queries"
        ));
    }
    Ok(())
}

/// Attendance rows without a matching student.
pub fn orphaned_attendance(conn: &Connection) -> AppResult<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM attendance a
         LEFT JOIN students s ON s.id = a.student_id
         WHERE s.id IS NULL",
        [],
        |row| row.get(0),
    )?;
    Ok(n)
}
