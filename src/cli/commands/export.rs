use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::students::StudentLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportLogic;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        student,
        force,
    } = cmd
    {
        let mut pool = DbPool::open(&cfg.database)?;

        let student = match student {
            Some(key) => Some(StudentLogic::lookup(&pool, key)?),
            None => None,
        };

        ExportLogic::export(&mut pool, *format, file, student.as_ref(), *force)?;
    }
    Ok(())
}
