pub mod config;
pub mod import;
pub mod labels;
pub mod ledger;
pub mod log;
pub mod resolver;
pub mod session;
pub mod students;
