use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ledger::AttendanceLogic;
use crate::core::students::StudentLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::attendance_status::AttendanceStatus;
use crate::ui::messages::header;
use crate::utils::colors::{CYAN, RESET, color_for_status};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Summary { student } = cmd {
        let pool = DbPool::open(&cfg.database)?;
        let s = StudentLogic::lookup(&pool, student)?;
        let summary = AttendanceLogic::summarize(&pool, &s)?;

        header(format!("Summary for {}", s.name));

        for status in AttendanceStatus::ALL {
            println!(
                "{}• {:<8}{} {}{}{}",
                CYAN,
                format!("{}:", status.label()),
                RESET,
                color_for_status(status),
                summary.count(status),
                RESET
            );
        }
        println!("{}• {:<8}{} {}", CYAN, "Total:", RESET, summary.total());
    }
    Ok(())
}
