use rollcall::core::labels::LabelMap;
use rollcall::core::resolver::{IdentityResolver, Recognition, Resolution};
use rollcall::errors::AppError;
use rollcall::models::student::Student;
use rollcall::models::student_status::StudentStatus;

fn student(id: i64, name: &str) -> Student {
    Student {
        id,
        name: name.to_string(),
        email: None,
        student_id: None,
        status: StudentStatus::Active,
        created_at: "2024-01-01T00:00:00".to_string(),
    }
}

fn roster() -> Vec<Student> {
    vec![student(1, "Ann"), student(2, "Josh"), student(3, "Zoe")]
}

#[test]
fn test_confident_exact_label_resolves() {
    let resolver = IdentityResolver::new(100.0);
    let res = resolver
        .resolve(roster().as_slice(), &Recognition::new("Ann", 42.0))
        .unwrap();
    assert_eq!(res.student().map(|s| s.id), Some(1));
}

#[test]
fn test_label_is_matched_case_insensitively() {
    let resolver = IdentityResolver::new(100.0);
    let res = resolver
        .resolve(roster().as_slice(), &Recognition::new("josh", 10.0))
        .unwrap();
    assert_eq!(res, Resolution::Resolved(student(2, "Josh")));
}

#[test]
fn test_exact_match_wins_over_case_insensitive() {
    let resolver = IdentityResolver::new(100.0);
    let students = vec![student(1, "ANN"), student(2, "Ann")];
    let res = resolver
        .resolve(students.as_slice(), &Recognition::new("Ann", 1.0))
        .unwrap();
    assert_eq!(res.student().map(|s| s.id), Some(2));
}

#[test]
fn test_confidence_at_or_above_threshold_is_low() {
    let resolver = IdentityResolver::new(100.0);

    let at = resolver
        .resolve(roster().as_slice(), &Recognition::new("Ann", 100.0))
        .unwrap();
    assert_eq!(at, Resolution::LowConfidence { confidence: 100.0 });

    let above = resolver
        .resolve(roster().as_slice(), &Recognition::new("Ann", 180.5))
        .unwrap();
    assert!(matches!(above, Resolution::LowConfidence { .. }));

    assert!(!resolver.is_confident(f64::NAN));
}

#[test]
fn test_unregistered_label_is_reported() {
    let resolver = IdentityResolver::new(100.0);
    let res = resolver
        .resolve(roster().as_slice(), &Recognition::new("  Omar ", 20.0))
        .unwrap();
    assert_eq!(
        res,
        Resolution::UnregisteredSubject {
            label: "Omar".to_string()
        }
    );

    let err = res.into_result().unwrap_err();
    assert!(matches!(err, AppError::UnregisteredSubject(ref l) if l == "Omar"));
}

#[test]
fn test_low_confidence_into_result_is_error() {
    let err = Resolution::LowConfidence { confidence: 150.0 }
        .into_result()
        .unwrap_err();
    assert!(matches!(err, AppError::LowConfidence(c) if c == 150.0));
}

#[test]
fn test_label_map_assigns_ids_in_order() {
    let mut map = LabelMap::from_names(["Ann", "Josh", "Ann"]);
    assert_eq!(map.len(), 2);
    assert_eq!(map.id_of("Ann"), Some(0));
    assert_eq!(map.name_of(1), Some("Josh"));
    assert_eq!(map.insert("Zoe"), 2);
    assert_eq!(map.insert("Josh"), 1);
    assert_eq!(map.name_of(9), None);
}

#[test]
fn test_label_map_save_and_load() {
    let path = std::env::temp_dir().join("rollcall_resolver_labels.json");
    std::fs::remove_file(&path).ok();

    assert!(LabelMap::load(&path).unwrap().is_empty());

    let map = LabelMap::from_names(["Ann", "Josh"]);
    map.save(&path).unwrap();
    assert_eq!(LabelMap::load(&path).unwrap(), map);
}
