pub mod attendance;
pub mod attendance_status;
pub mod student;
pub mod student_status;
pub mod summary;
