mod common;
use common::{open_pool, temp_dir};
use rollcall::core::import::{ImportLogic, sample_owner};
use rollcall::core::students::StudentLogic;
use rollcall::models::student::NewStudent;
use std::fs;

#[test]
fn test_sample_owner_parses_file_names() {
    assert_eq!(sample_owner("Josh_0.jpg").as_deref(), Some("Josh"));
    assert_eq!(sample_owner("Mary_Ann_12.png").as_deref(), Some("Mary_Ann"));
    assert_eq!(sample_owner("Josh.jpg"), None);
    assert_eq!(sample_owner("Josh_0.txt"), None);
    assert_eq!(sample_owner("_0.jpg"), None);
}

#[test]
fn test_scan_deduplicates_owners() {
    let dir = temp_dir("import_scan");
    for f in ["Ann_0.jpg", "Ann_1.jpg", "Bob_0.png", "readme.md"] {
        fs::write(dir.join(f), b"").unwrap();
    }
    fs::create_dir_all(dir.join("Cleo_0.jpg")).unwrap();

    let names: Vec<String> = ImportLogic::scan(&dir).unwrap().into_iter().collect();
    assert_eq!(names, vec!["Ann", "Bob"]);
}

#[test]
fn test_from_samples_registers_only_new_owners() {
    let mut pool = open_pool("import_from_samples");
    StudentLogic::add(&mut pool, &NewStudent::named("Ann")).unwrap();

    let dir = temp_dir("import_from_samples");
    for f in ["Ann_0.jpg", "Bob_0.jpg", "Bob_1.jpg", "Cleo_4.png"] {
        fs::write(dir.join(f), b"").unwrap();
    }

    let report = ImportLogic::from_samples(&mut pool, &dir).unwrap();
    assert_eq!(report.existing, vec!["Ann"]);
    assert_eq!(report.added, vec!["Bob", "Cleo"]);
    assert!(report.failed.is_empty());
    assert_eq!(StudentLogic::list(&pool).unwrap().len(), 3);

    let again = ImportLogic::from_samples(&mut pool, &dir).unwrap();
    assert!(again.added.is_empty());
    assert_eq!(again.existing.len(), 3);
}
