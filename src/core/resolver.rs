//! Identity resolution: classifier label + confidence → registered student.
//!
//! Confidence follows the recognizer's distance convention: lower values
//! mean a closer match. A value at or above the threshold is "unknown".

use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::student::Student;

/// Source of registered students for the resolver.
pub trait StudentDirectory {
    /// Exact, case-sensitive lookup.
    fn find_exact(&self, name: &str) -> AppResult<Option<Student>>;

    /// Every registered student, ordered by name.
    fn all_students(&self) -> AppResult<Vec<Student>>;
}

impl StudentDirectory for DbPool {
    fn find_exact(&self, name: &str) -> AppResult<Option<Student>> {
        Ok(queries::load_student_by_name(&self.conn, name)?)
    }

    fn all_students(&self) -> AppResult<Vec<Student>> {
        Ok(queries::load_students(&self.conn)?)
    }
}

impl StudentDirectory for [Student] {
    fn find_exact(&self, name: &str) -> AppResult<Option<Student>> {
        Ok(self.iter().find(|s| s.name == name).cloned())
    }

    fn all_students(&self) -> AppResult<Vec<Student>> {
        let mut all = self.to_vec();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }
}

/// Classifier output for one face.
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    pub label: String,
    pub confidence: f64,
}

impl Recognition {
    pub fn new(label: &str, confidence: f64) -> Self {
        Self {
            label: label.to_string(),
            confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(Student),
    /// Confidence at or above the threshold: the subject is unknown.
    LowConfidence { confidence: f64 },
    /// Confidently recognized label with no registration behind it.
    UnregisteredSubject { label: String },
}

impl Resolution {
    pub fn student(&self) -> Option<&Student> {
        match self {
            Resolution::Resolved(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_result(self) -> AppResult<Student> {
        match self {
            Resolution::Resolved(s) => Ok(s),
            Resolution::LowConfidence { confidence } => Err(AppError::LowConfidence(confidence)),
            Resolution::UnregisteredSubject { label } => {
                Err(AppError::UnregisteredSubject(label))
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IdentityResolver {
    threshold: f64,
}

impl IdentityResolver {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn is_confident(&self, confidence: f64) -> bool {
        // NaN compares false: treated as unknown
        confidence < self.threshold
    }

    pub fn resolve<D>(&self, directory: &D, recognition: &Recognition) -> AppResult<Resolution>
    where
        D: StudentDirectory + ?Sized,
    {
        if !self.is_confident(recognition.confidence) {
            return Ok(Resolution::LowConfidence {
                confidence: recognition.confidence,
            });
        }

        let label = recognition.label.trim();

        if let Some(student) = directory.find_exact(label)? {
            return Ok(Resolution::Resolved(student));
        }

        let found = directory
            .all_students()?
            .into_iter()
            .find(|s| s.name_matches(label));

        Ok(match found {
            Some(student) => Resolution::Resolved(student),
            None => Resolution::UnregisteredSubject {
                label: label.to_string(),
            },
        })
    }
}
