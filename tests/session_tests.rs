mod common;
use chrono::NaiveDate;
use common::open_pool;
use rollcall::core::labels::LabelMap;
use rollcall::core::resolver::IdentityResolver;
use rollcall::core::session::{
    Capture, CaptureSource, Classifier, FaceCrop, Mode, Prediction, SampleSink, Session,
    SessionContext, SessionEvent,
};
use rollcall::core::students::StudentLogic;
use rollcall::errors::AppResult;
use rollcall::models::attendance_status::AttendanceStatus;
use rollcall::models::student::NewStudent;
use std::collections::VecDeque;

/// Classifier that reads the label id and distance out of the first two pixels.
struct PixelClassifier;

impl Classifier for PixelClassifier {
    fn predict(&self, face: &FaceCrop) -> Option<Prediction> {
        match face.pixels.as_slice() {
            [id, dist, ..] => Some(Prediction {
                label_id: *id as i32,
                confidence: *dist as f64,
            }),
            _ => None,
        }
    }
}

#[derive(Default)]
struct MemorySink {
    stored: Vec<String>,
}

impl SampleSink for MemorySink {
    fn store(&mut self, file_stem: &str, _face: &FaceCrop) -> AppResult<()> {
        self.stored.push(file_stem.to_string());
        Ok(())
    }
}

struct Frames(VecDeque<Capture>);

impl CaptureSource for Frames {
    fn next_capture(&mut self) -> Option<Capture> {
        self.0.pop_front()
    }
}

fn face(pixels: &[u8]) -> Capture {
    Capture::Face(FaceCrop {
        width: 2,
        height: 1,
        pixels: pixels.to_vec(),
    })
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

#[test]
fn test_registration_collects_samples_on_interval() {
    let mut pool = open_pool("session_register");
    let mut labels = LabelMap::default();
    let mut sink = MemorySink::default();
    let classifier = PixelClassifier;

    let mut session = Session::register("Ann", 2, 3).unwrap();
    let mut ctx = SessionContext {
        pool: &mut pool,
        classifier: &classifier,
        labels: &mut labels,
        sink: &mut sink,
    };

    // frames 0 and 3 are on the interval; a missing face does not count
    assert_eq!(
        session.process(&mut ctx, &face(&[0, 0])).unwrap(),
        SessionEvent::SampleCaptured {
            collected: 1,
            needed: 2
        }
    );
    assert_eq!(session.process(&mut ctx, &Capture::NoFace).unwrap(), SessionEvent::NoFace);
    assert_eq!(session.process(&mut ctx, &face(&[0, 0])).unwrap(), SessionEvent::Waiting);
    assert_eq!(session.process(&mut ctx, &face(&[0, 0])).unwrap(), SessionEvent::Waiting);

    match session.process(&mut ctx, &face(&[0, 0])).unwrap() {
        SessionEvent::RegistrationComplete { student, samples } => {
            assert_eq!(student.name, "Ann");
            assert_eq!(samples, 2);
        }
        other => panic!("expected RegistrationComplete, got {:?}", other),
    }
    assert!(session.is_idle());
    drop(ctx);

    assert_eq!(sink.stored, vec!["Ann_0", "Ann_1"]);
    assert_eq!(labels.id_of("Ann"), Some(0));
    assert!(StudentLogic::find_by_name(&pool, "Ann").unwrap().is_some());
}

#[test]
fn test_registration_rejects_bad_parameters() {
    assert!(Session::register("  ", 5, 1).is_err());
    assert!(Session::register("Ann", 0, 1).is_err());

    let session = Session::register(" Ann ", 1, 0).unwrap();
    assert_eq!(
        session.mode(),
        &Mode::Register {
            name: "Ann".to_string(),
            collected: 0,
            needed: 1
        }
    );
}

#[test]
fn test_attendance_session_marks_each_student_once() {
    let mut pool = open_pool("session_attendance");
    StudentLogic::add(&mut pool, &NewStudent::named("Ann")).unwrap();
    StudentLogic::add(&mut pool, &NewStudent::named("Josh")).unwrap();

    let mut labels = LabelMap::from_names(["Ann", "Josh", "Ghost"]);
    let mut sink = MemorySink::default();
    let classifier = PixelClassifier;

    let mut session = Session::attendance(
        IdentityResolver::new(100.0),
        day(),
        AttendanceStatus::Present,
    );
    let mut ctx = SessionContext {
        pool: &mut pool,
        classifier: &classifier,
        labels: &mut labels,
        sink: &mut sink,
    };

    let mut frames = Frames(VecDeque::from(vec![
        face(&[0, 40]),
        face(&[0, 35]),
        face(&[1, 150]),
        face(&[2, 10]),
        face(&[9, 10]),
        face(&[]),
        Capture::NoFace,
        face(&[1, 60]),
    ]));

    let events = session.run(&mut ctx, &mut frames).unwrap();
    assert_eq!(events.len(), 8);

    assert!(matches!(&events[0], SessionEvent::Marked { student, .. } if student.name == "Ann"));
    assert!(matches!(&events[1], SessionEvent::AlreadySeen(s) if s.name == "Ann"));
    assert_eq!(events[2], SessionEvent::LowConfidence { confidence: 150.0 });
    assert_eq!(
        events[3],
        SessionEvent::Unregistered {
            label: "Ghost".to_string()
        }
    );
    assert_eq!(events[4], SessionEvent::UnknownLabel(9));
    assert_eq!(events[5], SessionEvent::NoIdentity);
    assert_eq!(events[6], SessionEvent::NoFace);
    assert!(matches!(&events[7], SessionEvent::Marked { student, .. } if student.name == "Josh"));
    assert!(!session.is_idle());
}

#[test]
fn test_new_session_does_not_overwrite_earlier_mark() {
    let mut pool = open_pool("session_already_marked");
    StudentLogic::add(&mut pool, &NewStudent::named("Ann")).unwrap();

    let mut labels = LabelMap::from_names(["Ann"]);
    let mut sink = MemorySink::default();
    let classifier = PixelClassifier;
    let mut ctx = SessionContext {
        pool: &mut pool,
        classifier: &classifier,
        labels: &mut labels,
        sink: &mut sink,
    };

    let resolver = IdentityResolver::new(100.0);
    let mut first = Session::attendance(resolver, day(), AttendanceStatus::Present);
    let marked = first.process(&mut ctx, &face(&[0, 20])).unwrap();
    let SessionEvent::Marked { event, .. } = marked else {
        panic!("expected Marked, got {:?}", marked);
    };

    let mut second = Session::attendance(resolver, day(), AttendanceStatus::Late);
    match second.process(&mut ctx, &face(&[0, 20])).unwrap() {
        SessionEvent::AlreadyMarked { event: existing, .. } => {
            assert_eq!(existing, event);
            assert_eq!(existing.status, AttendanceStatus::Present);
        }
        other => panic!("expected AlreadyMarked, got {:?}", other),
    }
}

#[test]
fn test_idle_session_ignores_frames() {
    let mut pool = open_pool("session_idle");
    let mut labels = LabelMap::default();
    let mut sink = MemorySink::default();
    let classifier = PixelClassifier;
    let mut ctx = SessionContext {
        pool: &mut pool,
        classifier: &classifier,
        labels: &mut labels,
        sink: &mut sink,
    };

    let mut session = Session::idle(IdentityResolver::new(100.0));
    assert_eq!(session.process(&mut ctx, &face(&[0, 0])).unwrap(), SessionEvent::Idle);
    assert_eq!(session.process(&mut ctx, &Capture::NoFace).unwrap(), SessionEvent::Idle);

    let mut frames = Frames(VecDeque::from(vec![face(&[0, 0])]));
    assert!(session.run(&mut ctx, &mut frames).unwrap().is_empty());
}

#[test]
fn test_registration_reuses_student_with_differently_cased_name() {
    let mut pool = open_pool("session_register_case");
    let josh = StudentLogic::add(&mut pool, &NewStudent::named("Josh")).unwrap();

    let mut labels = LabelMap::default();
    let mut sink = MemorySink::default();
    let classifier = PixelClassifier;
    let mut ctx = SessionContext {
        pool: &mut pool,
        classifier: &classifier,
        labels: &mut labels,
        sink: &mut sink,
    };

    let mut session = Session::register("josh", 1, 1).unwrap();
    match session.process(&mut ctx, &face(&[0, 0])).unwrap() {
        SessionEvent::RegistrationComplete { student, .. } => assert_eq!(student, josh),
        other => panic!("expected RegistrationComplete, got {:?}", other),
    }
    drop(ctx);

    assert_eq!(StudentLogic::list(&pool).unwrap().len(), 1);
    assert_eq!(labels.id_of("Josh"), Some(0));
    assert_eq!(sink.stored, vec!["josh_0"]);
}
