mod common;
use common::{init_db, init_db_with_students, mark, rc, setup_test_db};
use predicates::str::contains;

#[test]
fn test_student_add_and_list() {
    let db_path = setup_test_db("student_add_list");
    init_db(&db_path);

    rc().args([
        "--db", &db_path, "student", "add", "Ann", "--email", "ann@school.test", "--sid", "S-001",
    ])
    .assert()
    .success()
    .stdout(contains("Student 'Ann' added (id 1)"));

    rc().args(["--db", &db_path, "student", "list"])
        .assert()
        .success()
        .stdout(contains("Ann"))
        .stdout(contains("ann@school.test"))
        .stdout(contains("S-001"))
        .stdout(contains("active"));
}

#[test]
fn test_student_list_empty() {
    let db_path = setup_test_db("student_list_empty");
    init_db(&db_path);

    rc().args(["--db", &db_path, "student", "list"])
        .assert()
        .success()
        .stdout(contains("No students registered."));
}

#[test]
fn test_student_add_duplicate_name_fails() {
    let db_path = setup_test_db("student_dup_name");
    init_db_with_students(&db_path);

    rc().args(["--db", &db_path, "student", "add", "Ann"])
        .assert()
        .failure()
        .stderr(contains("already registered"));
}

#[test]
fn test_student_add_duplicate_sid_fails() {
    let db_path = setup_test_db("student_dup_sid");
    init_db_with_students(&db_path);

    rc().args(["--db", &db_path, "student", "add", "Mia", "--sid", "S-002"])
        .assert()
        .failure()
        .stderr(contains("S-002"))
        .stderr(contains("already assigned"));
}

#[test]
fn test_student_update_name_and_status() {
    let db_path = setup_test_db("student_update");
    init_db_with_students(&db_path);

    rc().args([
        "--db", &db_path, "student", "update", "Zoe", "--name", "Zoey", "--status", "inactive",
    ])
    .assert()
    .success()
    .stdout(contains("updated: Zoey"));

    rc().args(["--db", &db_path, "student", "list"])
        .assert()
        .success()
        .stdout(contains("Zoey"))
        .stdout(contains("inactive"));
}

#[test]
fn test_student_update_without_fields_fails() {
    let db_path = setup_test_db("student_update_empty");
    init_db_with_students(&db_path);

    rc().args(["--db", &db_path, "student", "update", "Ann"])
        .assert()
        .failure()
        .stderr(contains("No updates provided"));
}

#[test]
fn test_student_update_bad_status_fails() {
    let db_path = setup_test_db("student_update_bad_status");
    init_db_with_students(&db_path);

    rc().args(["--db", &db_path, "student", "update", "Ann", "--status", "gone"])
        .assert()
        .failure()
        .stderr(contains("Invalid attendance status"));
}

#[test]
fn test_student_del_with_yes_removes_history() {
    let db_path = setup_test_db("student_del_yes");
    init_db_with_students(&db_path);
    mark(&db_path, "Ann", "2024-01-10", "09:00:00");
    mark(&db_path, "Ann", "2024-01-11", "09:02:00");

    rc().args(["--db", &db_path, "student", "del", "Ann", "--yes"])
        .assert()
        .success()
        .stdout(contains("2 attendance records removed"));

    rc().args(["--db", &db_path, "history", "Ann"])
        .assert()
        .failure()
        .stderr(contains("Student not found"));
}

#[test]
fn test_student_del_confirmed_on_stdin() {
    let db_path = setup_test_db("student_del_prompt_yes");
    init_db_with_students(&db_path);

    rc().args(["--db", &db_path, "student", "del", "Josh"])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(contains("Student 'Josh' deleted"));
}

#[test]
fn test_student_del_cancelled() {
    let db_path = setup_test_db("student_del_prompt_no");
    init_db_with_students(&db_path);

    rc().args(["--db", &db_path, "student", "del", "Josh"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Operation cancelled."));

    rc().args(["--db", &db_path, "student", "list"])
        .assert()
        .success()
        .stdout(contains("Josh"));
}

#[test]
fn test_student_import_from_sample_dir() {
    let db_path = setup_test_db("student_import");
    init_db_with_students(&db_path);

    let dir = common::temp_dir("student_import");
    for f in ["Ann_0.jpg", "Ann_1.jpg", "Mary_Ann_0.jpg", "Omar_3.png", "notes.txt"] {
        std::fs::write(dir.join(f), b"").unwrap();
    }

    let dir_arg = dir.to_string_lossy().to_string();
    rc().args(["--db", &db_path, "student", "import", &dir_arg])
        .assert()
        .success()
        .stdout(contains("Ann - already in database"))
        .stdout(contains("Mary_Ann - added to database"))
        .stdout(contains("Omar - added to database"))
        .stdout(contains("2 added, 1 already present, 0 failed"));
}

#[test]
fn test_student_import_missing_dir_fails() {
    let db_path = setup_test_db("student_import_missing");
    init_db(&db_path);

    rc().args(["--db", &db_path, "student", "import", "/nonexistent/rollcall/samples"])
        .assert()
        .failure()
        .stderr(contains("No sample directory"));
}
