mod common;
use common::setup_test_db;
use rollcall::core::students::StudentLogic;
use rollcall::db::initialize::orphaned_attendance;
use rollcall::db::log::load_log;
use rollcall::db::pool::DbPool;
use rollcall::models::student::NewStudent;
use rusqlite::Connection;

#[test]
fn test_fresh_database_has_schema_and_marker() {
    let db_path = setup_test_db("migration_fresh");
    let pool = DbPool::open(&db_path).unwrap();

    for table in ["log", "students", "attendance"] {
        let n: i64 = pool
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [table],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(n, 1, "missing table {table}");
    }

    let log = load_log(&pool.conn).unwrap();
    assert!(log.iter().any(|(_, _, op, target, _)| op == "migration_applied"
        && target == "20250301_0002_blank_identifiers_to_null"));
}

#[test]
fn test_legacy_blank_identifiers_become_null() {
    let db_path = setup_test_db("migration_legacy");
    {
        let conn = Connection::open(&db_path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE students (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT UNIQUE NOT NULL,
                email       TEXT,
                student_id  TEXT UNIQUE,
                created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                status      TEXT NOT NULL DEFAULT 'active'
            );
            INSERT INTO students (name, email, student_id) VALUES ('Ann', '', '');
            INSERT INTO students (name, email, student_id) VALUES ('Bob', 'bob@school.test', 'S-2');
            "#,
        )
        .unwrap();
    }

    let mut pool = DbPool::open(&db_path).unwrap();

    let ann = StudentLogic::find_by_name(&pool, "Ann").unwrap().unwrap();
    assert_eq!(ann.student_id, None);
    assert_eq!(ann.email, None);

    let bob = StudentLogic::find_by_name(&pool, "Bob").unwrap().unwrap();
    assert_eq!(bob.student_id.as_deref(), Some("S-2"));

    // a second student without an id no longer collides with Ann
    StudentLogic::add(&mut pool, &NewStudent::named("Cleo")).unwrap();

    // reopening does not re-run the migration
    drop(pool);
    let pool = DbPool::open(&db_path).unwrap();
    let markers = load_log(&pool.conn)
        .unwrap()
        .into_iter()
        .filter(|(_, _, op, _, _)| op == "migration_applied")
        .count();
    assert_eq!(markers, 1);
}

#[test]
fn test_orphaned_attendance_is_counted() {
    let db_path = setup_test_db("migration_orphans");
    {
        let conn = Connection::open(&db_path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE students (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT UNIQUE NOT NULL,
                email       TEXT,
                student_id  TEXT UNIQUE,
                created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                status      TEXT NOT NULL DEFAULT 'active'
            );
            CREATE TABLE attendance (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                student_id  INTEGER NOT NULL,
                date        TEXT NOT NULL,
                time_in     TEXT,
                status      TEXT NOT NULL DEFAULT 'present',
                created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(student_id, date)
            );
            INSERT INTO students (name) VALUES ('Ann');
            INSERT INTO attendance (student_id, date, time_in) VALUES (1, '2024-01-10', '09:00:00');
            INSERT INTO attendance (student_id, date, time_in) VALUES (42, '2024-01-10', '09:00:00');
            "#,
        )
        .unwrap();
    }

    let pool = DbPool::open(&db_path).unwrap();
    assert_eq!(orphaned_attendance(&pool.conn).unwrap(), 1);
}
