use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ledger::AttendanceLogic;
use crate::core::students::StudentLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::colors::{colorize_optional, colorize_status};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::History { student, limit } = cmd {
        let pool = DbPool::open(&cfg.database)?;
        let s = StudentLogic::lookup(&pool, student)?;
        let events = AttendanceLogic::history(&pool, &s, *limit)?;

        header(format!("Attendance of {}", s.name));

        if events.is_empty() {
            info(format!("No attendance records for {}", s.name));
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("Date"),
            Column::new("Time"),
            Column::new("Status"),
        ]);
        for ev in &events {
            table.add_row(vec![
                ev.date_str(),
                colorize_optional(&ev.time_str()),
                colorize_status(ev.status),
            ]);
        }
        print!("{}", table.render());
    }
    Ok(())
}
