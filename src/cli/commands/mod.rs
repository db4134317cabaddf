pub mod config;
pub mod daily;
pub mod export;
pub mod history;
pub mod init;
pub mod log;
pub mod mark;
pub mod student;
pub mod summary;
