use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::labels::LabelMap;
use crate::core::ledger::AttendanceLogic;
use crate::core::resolver::{IdentityResolver, Recognition};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::MarkOutcome;
use crate::models::attendance_status::AttendanceStatus;
use crate::ui::messages::{success, warning};
use crate::utils::{date, time};
use std::path::Path;

/// Resolve a recognized label and mark attendance for it.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Mark {
        label,
        label_id,
        labels,
        confidence,
        date: date_arg,
        time: time_arg,
        status,
        force,
    } = cmd
    {
        //
        // 1. Parse inputs
        //
        let d = date::parse_date_or_today(date_arg.as_ref())?;

        let t = match time::parse_optional_time(time_arg.as_ref())? {
            Some(t) => t,
            None => time::now(),
        };

        let st = match status {
            Some(code) => AttendanceStatus::from_code(code)
                .ok_or_else(|| AppError::InvalidStatus(code.to_string()))?,
            None => cfg.default_attendance_status()?,
        };

        //
        // 2. Resolve identity
        //
        let label = match (label, label_id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => {
                let file = labels.as_deref().unwrap_or(&cfg.labels_file);
                let map = LabelMap::load(Path::new(file))?;
                map.name_of(*id)
                    .map(str::to_string)
                    .ok_or(AppError::UnknownLabel(*id))?
            }
            (None, None) => return Err(AppError::Other("a label or --label-id is required".into())),
        };

        let mut pool = DbPool::open(&cfg.database)?;
        let resolver = IdentityResolver::new(cfg.confidence_threshold);
        let student = resolver
            .resolve(&pool, &Recognition::new(&label, *confidence))?
            .into_result()?;

        //
        // 3. Write to the ledger
        //
        if *force {
            let ev = AttendanceLogic::force_mark(&mut pool, &student, d, Some(t), st)?;
            success(format!(
                "Attendance for {} on {} set to {} at {}",
                student.name,
                ev.date_str(),
                ev.status.to_db_str(),
                ev.time_str()
            ));
            return Ok(());
        }

        match AttendanceLogic::mark(&mut pool, &student, d, Some(t), st)? {
            MarkOutcome::Recorded(ev) => success(format!(
                "Attendance marked for {}: {} at {} ({})",
                student.name,
                ev.date_str(),
                ev.time_str(),
                ev.status.to_db_str()
            )),
            MarkOutcome::AlreadyMarked(ev) => warning(format!(
                "Attendance already marked for {} on {} at {} ({}). Use --force to overwrite.",
                student.name,
                ev.date_str(),
                ev.time_str(),
                ev.status.to_db_str()
            )),
        }
    }

    Ok(())
}
