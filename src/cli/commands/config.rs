use crate::cli::parser::Commands;
use crate::config::{Config, migrate};
use crate::core::config::ConfigLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        migrate: run_migrate,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            ConfigLogic::print(cfg)?;
        }

        if *check {
            if !path.exists() {
                info(format!(
                    "No configuration file at {} (defaults in use)",
                    path.display()
                ));
            } else {
                let missing = migrate::missing_fields(&path)?;
                if missing.is_empty() {
                    success("Configuration file is complete.");
                } else {
                    warning(format!(
                        "Missing fields: {} (run `config --migrate`)",
                        missing.join(", ")
                    ));
                }
            }
        }

        if *run_migrate && !migrate::run_config_migrations(&path)? {
            info("Configuration already up to date.");
        }

        if *edit_config {
            ConfigLogic::edit(&path, editor)?;
        }
    }

    Ok(())
}
