//! Capture session: the explicit state behind a running camera.
//!
//! A session is either idle, collecting face samples for a new student, or
//! recognizing faces and marking attendance. Detection, recognition and
//! pixel handling belong to the injected collaborators; the session only
//! sees face crops, classifier predictions and the ledger.

use crate::core::labels::LabelMap;
use crate::core::ledger::AttendanceLogic;
use crate::core::resolver::{IdentityResolver, Recognition, Resolution};
use crate::core::students::StudentLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceEvent, MarkOutcome};
use crate::models::attendance_status::AttendanceStatus;
use crate::models::student::{NewStudent, Student};
use crate::utils::time;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Grayscale face region cut out by the detector.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceCrop {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// One frame as seen by the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Capture {
    Face(FaceCrop),
    NoFace,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label_id: i32,
    pub confidence: f64,
}

pub trait Classifier {
    /// `None` when the model has no identity to offer.
    fn predict(&self, face: &FaceCrop) -> Option<Prediction>;
}

pub trait CaptureSource {
    /// `None` once the source is exhausted or closed.
    fn next_capture(&mut self) -> Option<Capture>;
}

/// Where registration samples go. Files are named `{name}_{n}`.
pub trait SampleSink {
    fn store(&mut self, file_stem: &str, face: &FaceCrop) -> AppResult<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Idle,
    Register {
        name: String,
        collected: u32,
        needed: u32,
    },
    Attendance {
        date: NaiveDate,
        status: AttendanceStatus,
        marked_today: BTreeSet<i64>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Idle,
    NoFace,
    /// Face present but this frame is between two capture intervals.
    Waiting,
    SampleCaptured {
        collected: u32,
        needed: u32,
    },
    RegistrationComplete {
        student: Student,
        samples: u32,
    },
    NoIdentity,
    LowConfidence {
        confidence: f64,
    },
    UnknownLabel(i32),
    Unregistered {
        label: String,
    },
    Marked {
        student: Student,
        event: AttendanceEvent,
    },
    AlreadyMarked {
        student: Student,
        event: AttendanceEvent,
    },
    /// Student already handled earlier in this session; the ledger is not queried.
    AlreadySeen(Student),
}

/// Collaborators a session works against.
pub struct SessionContext<'a> {
    pub pool: &'a mut DbPool,
    pub classifier: &'a dyn Classifier,
    pub labels: &'a mut LabelMap,
    pub sink: &'a mut dyn SampleSink,
}

#[derive(Debug, Clone)]
pub struct Session {
    mode: Mode,
    frame_count: u32,
    capture_interval: u32,
    resolver: IdentityResolver,
}

impl Session {
    pub fn idle(resolver: IdentityResolver) -> Self {
        Self {
            mode: Mode::Idle,
            frame_count: 0,
            capture_interval: 1,
            resolver,
        }
    }

    /// Start collecting `needed` samples for `name`, one every `interval` face frames.
    pub fn register(name: &str, needed: u32, interval: u32) -> AppResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidName(name.to_string()));
        }
        if needed == 0 {
            return Err(AppError::Config("samples_needed must be at least 1".into()));
        }

        Ok(Self {
            mode: Mode::Register {
                name: name.to_string(),
                collected: 0,
                needed,
            },
            frame_count: 0,
            capture_interval: interval.max(1),
            resolver: IdentityResolver::new(0.0),
        })
    }

    /// Start recognizing faces and marking attendance for `date`.
    pub fn attendance(resolver: IdentityResolver, date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            mode: Mode::Attendance {
                date,
                status,
                marked_today: BTreeSet::new(),
            },
            frame_count: 0,
            capture_interval: 1,
            resolver,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.mode, Mode::Idle)
    }

    pub fn stop(&mut self) {
        self.mode = Mode::Idle;
        self.frame_count = 0;
    }

    /// Handle one capture according to the current mode.
    pub fn process(&mut self, ctx: &mut SessionContext<'_>, capture: &Capture) -> AppResult<SessionEvent> {
        let face = match capture {
            Capture::Face(face) => face,
            Capture::NoFace if self.is_idle() => return Ok(SessionEvent::Idle),
            Capture::NoFace => return Ok(SessionEvent::NoFace),
        };

        match self.mode {
            Mode::Idle => Ok(SessionEvent::Idle),
            Mode::Register { .. } => self.process_registration(ctx, face),
            Mode::Attendance { .. } => self.process_attendance(ctx, face),
        }
    }

    /// Drain `source` until it ends or the session goes idle.
    pub fn run(
        &mut self,
        ctx: &mut SessionContext<'_>,
        source: &mut dyn CaptureSource,
    ) -> AppResult<Vec<SessionEvent>> {
        let mut events = Vec::new();
        while !self.is_idle() {
            let Some(capture) = source.next_capture() else {
                break;
            };
            events.push(self.process(ctx, &capture)?);
        }
        Ok(events)
    }

    fn process_registration(
        &mut self,
        ctx: &mut SessionContext<'_>,
        face: &FaceCrop,
    ) -> AppResult<SessionEvent> {
        let Mode::Register {
            name,
            collected,
            needed,
        } = &mut self.mode
        else {
            return Ok(SessionEvent::Idle);
        };

        let on_interval = self.frame_count % self.capture_interval == 0;
        self.frame_count += 1;

        if !on_interval || *collected >= *needed {
            return Ok(SessionEvent::Waiting);
        }

        ctx.sink.store(&format!("{}_{}", name, collected), face)?;
        *collected += 1;

        if *collected < *needed {
            return Ok(SessionEvent::SampleCaptured {
                collected: *collected,
                needed: *needed,
            });
        }

        let samples = *collected;
        let name = name.clone();

        let student = match StudentLogic::find_matching(ctx.pool, &name)? {
            Some(s) => s,
            None => StudentLogic::add(ctx.pool, &NewStudent::named(&name))?,
        };
        ctx.labels.insert(&student.name);

        self.stop();
        Ok(SessionEvent::RegistrationComplete { student, samples })
    }

    fn process_attendance(
        &mut self,
        ctx: &mut SessionContext<'_>,
        face: &FaceCrop,
    ) -> AppResult<SessionEvent> {
        let resolver = self.resolver;
        let Mode::Attendance {
            date,
            status,
            marked_today,
        } = &mut self.mode
        else {
            return Ok(SessionEvent::Idle);
        };

        let Some(prediction) = ctx.classifier.predict(face) else {
            return Ok(SessionEvent::NoIdentity);
        };

        if !resolver.is_confident(prediction.confidence) {
            return Ok(SessionEvent::LowConfidence {
                confidence: prediction.confidence,
            });
        }

        let Some(label) = ctx.labels.name_of(prediction.label_id) else {
            return Ok(SessionEvent::UnknownLabel(prediction.label_id));
        };

        let recognition = Recognition::new(label, prediction.confidence);
        let student = match resolver.resolve(&*ctx.pool, &recognition)? {
            Resolution::Resolved(s) => s,
            Resolution::LowConfidence { confidence } => {
                return Ok(SessionEvent::LowConfidence { confidence });
            }
            Resolution::UnregisteredSubject { label } => {
                return Ok(SessionEvent::Unregistered { label });
            }
        };

        if marked_today.contains(&student.id) {
            return Ok(SessionEvent::AlreadySeen(student));
        }

        let outcome = AttendanceLogic::mark(ctx.pool, &student, *date, Some(time::now()), *status)?;
        marked_today.insert(student.id);

        Ok(match outcome {
            MarkOutcome::Recorded(event) => SessionEvent::Marked { student, event },
            MarkOutcome::AlreadyMarked(event) => SessionEvent::AlreadyMarked { student, event },
        })
    }
}
