use super::student_status::StudentStatus;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Student {
    pub id: i64,                    // ⇔ students.id
    pub name: String,               // ⇔ students.name (UNIQUE)
    pub email: Option<String>,      // ⇔ students.email
    pub student_id: Option<String>, // ⇔ students.student_id (UNIQUE when not NULL)
    pub status: StudentStatus,      // ⇔ students.status ('active' | 'inactive')
    pub created_at: String,         // ⇔ students.created_at (TEXT, ISO8601)
}

impl Student {
    /// Case-insensitive name comparison used by the resolver.
    pub fn name_matches(&self, label: &str) -> bool {
        self.name.to_lowercase() == label.to_lowercase()
    }
}

/// Input for registering a new student.
#[derive(Debug, Clone, Default)]
pub struct NewStudent {
    pub name: String,
    pub email: Option<String>,
    pub student_id: Option<String>,
}

impl NewStudent {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// Admin edit: only the `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub student_id: Option<String>,
    pub status: Option<StudentStatus>,
}

impl StudentUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.student_id.is_none()
            && self.status.is_none()
    }
}
