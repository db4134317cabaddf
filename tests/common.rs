#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rollcall::db::pool::DbPool;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rc() -> Command {
    cargo_bin_cmd!("rollcall")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rollcall.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Fresh, empty directory inside tempdir
pub fn temp_dir(name: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rollcall_dir", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

/// Open (and migrate) a fresh database through the library API
pub fn open_pool(name: &str) -> DbPool {
    let db_path = setup_test_db(name);
    DbPool::open(&db_path).expect("open db")
}

/// Initialize DB through the CLI
pub fn init_db(db_path: &str) {
    rc().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Initialize DB and register a small roster useful for many tests
pub fn init_db_with_students(db_path: &str) {
    init_db(db_path);

    for (name, sid) in [("Ann", "S-001"), ("Josh", "S-002"), ("Zoe", "S-003")] {
        rc().args(["--db", db_path, "student", "add", name, "--sid", sid])
            .assert()
            .success();
    }
}

/// Mark attendance through the CLI at a fixed date/time
pub fn mark(db_path: &str, label: &str, date: &str, time: &str) {
    rc().args([
        "--db", db_path, "mark", label, "--date", date, "--time", time,
    ])
    .assert()
    .success();
}
