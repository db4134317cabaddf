//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / serialization
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),


    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid attendance status: {0}")]
    InvalidStatus(String),

    #[error("Invalid student name: {0:?}")]
    InvalidName(String),

    // ---------------------------
    // Ledger constraints
    // ---------------------------
    #[error("A student named '{0}' is already registered")]
    DuplicateName(String),

    #[error("Student id '{0}' is already assigned")]
    DuplicateStudentId(String),

    #[error("Student not found: {0}")]
    StudentNotFound(String),

    #[error("No updates provided")]
    NoUpdates,

    #[error("Attendance already marked for {name} on {date} at {time}")]
    AlreadyMarked {
        name: String,
        date: String,
        time: String,
    },

    // ---------------------------
    // Identity resolution
    // ---------------------------
    #[error("Recognition confidence too low ({0:.1})")]
    LowConfidence(f64),

    #[error("Subject '{0}' is not registered")]
    UnregisteredSubject(String),

    #[error("Label id {0} is not in the label map")]
    UnknownLabel(i32),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Output file already exists: {0} (use --force to overwrite)")]
    ExportFileExists(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// True for uniqueness violations on the students table.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            AppError::DuplicateName(_) | AppError::DuplicateStudentId(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
