use crate::cli::parser::{Commands, StudentAction};
use crate::config::Config;
use crate::core::import::ImportLogic;
use crate::core::students::StudentLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::student::{NewStudent, StudentUpdate};
use crate::models::student_status::StudentStatus;
use crate::ui::messages::{error, info, success, warning};
use crate::utils::colors::colorize_optional;
use crate::utils::table::{Column, Table};
use std::io::{self, Write};
use std::path::Path;

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Student { action } = cmd else {
        return Ok(());
    };

    let mut pool = DbPool::open(&cfg.database)?;

    match action {
        StudentAction::Add {
            name,
            email,
            student_id,
        } => {
            let s = StudentLogic::add(
                &mut pool,
                &NewStudent {
                    name: name.clone(),
                    email: email.clone(),
                    student_id: student_id.clone(),
                },
            )?;
            success(format!("Student '{}' added (id {})", s.name, s.id));
        }

        StudentAction::List => {
            let students = StudentLogic::list(&pool)?;
            if students.is_empty() {
                info("No students registered.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("ID"),
                Column::new("Name"),
                Column::new("Email"),
                Column::new("Student ID"),
                Column::new("Status"),
                Column::new("Created"),
            ]);
            for s in &students {
                table.add_row(vec![
                    s.id.to_string(),
                    s.name.clone(),
                    colorize_optional(s.email.as_deref().unwrap_or("--")),
                    colorize_optional(s.student_id.as_deref().unwrap_or("--")),
                    s.status.to_db_str().to_string(),
                    s.created_at.clone(),
                ]);
            }
            print!("{}", table.render());
        }

        StudentAction::Update {
            student,
            name,
            email,
            student_id,
            status,
        } => {
            let status = match status {
                Some(code) => Some(StudentStatus::from_db_str(code).ok_or_else(|| {
                    AppError::InvalidStatus(format!("{code} (expected active or inactive)"))
                })?),
                None => None,
            };

            let current = StudentLogic::lookup(&pool, student)?;
            let updated = StudentLogic::update(
                &mut pool,
                current.id,
                &StudentUpdate {
                    name: name.clone(),
                    email: email.clone(),
                    student_id: student_id.clone(),
                    status,
                },
            )?;
            success(format!("Student #{} updated: {}", updated.id, updated.name));
        }

        StudentAction::Del { student, yes } => {
            let s = StudentLogic::lookup(&pool, student)?;

            let prompt = format!(
                "Delete {} and all their attendance records? This action is irreversible.",
                s.name
            );
            if !*yes && !ask_confirmation(&prompt) {
                info("Operation cancelled.");
                return Ok(());
            }

            let removed = StudentLogic::delete(&mut pool, s.id)?;
            success(format!(
                "Student '{}' deleted ({} attendance records removed).",
                s.name, removed
            ));
        }

        StudentAction::Import { dir } => {
            let path = Path::new(dir);
            if !path.is_dir() {
                return Err(AppError::Io(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("No sample directory at {}", path.display()),
                )));
            }

            let report = ImportLogic::from_samples(&mut pool, path)?;

            for name in &report.existing {
                info(format!("{name} - already in database"));
            }
            for name in &report.added {
                success(format!("{name} - added to database"));
            }
            for (name, reason) in &report.failed {
                error(format!("{name} - {reason}"));
            }

            println!(
                "\nImport complete: {} added, {} already present, {} failed",
                report.added.len(),
                report.existing.len(),
                report.failed.len()
            );
        }
    }

    Ok(())
}
