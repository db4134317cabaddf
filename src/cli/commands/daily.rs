use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ledger::AttendanceLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::colors::{colorize_optional, colorize_status};
use crate::utils::date;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Daily { date: date_arg } = cmd {
        let d = date::parse_date_or_today(date_arg.as_ref())?;

        let pool = DbPool::open(&cfg.database)?;
        let rows = AttendanceLogic::daily(&pool, d)?;

        header(format!("Register of {}", d));

        if rows.is_empty() {
            info("No students registered.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("Name"),
            Column::new("Student ID"),
            Column::new("Time"),
            Column::new("Status"),
        ]);

        let mut marked = 0;
        for row in &rows {
            let sid = row.student.student_id.clone().unwrap_or_else(|| "--".into());
            let (time, status) = match &row.event {
                Some(ev) => {
                    marked += 1;
                    (ev.time_str(), colorize_status(ev.status))
                }
                None => ("--".to_string(), colorize_optional("--")),
            };
            table.add_row(vec![
                row.student.name.clone(),
                colorize_optional(&sid),
                colorize_optional(&time),
                status,
            ]);
        }

        print!("{}", table.render());
        println!("\nMarked: {}/{}", marked, rows.len());
    }
    Ok(())
}
