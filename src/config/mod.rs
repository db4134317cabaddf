use crate::errors::{AppError, AppResult};
use crate::models::attendance_status::AttendanceStatus;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod migrate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    /// Classifier distance at or above which a face counts as unknown.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
    #[serde(default = "default_samples_needed")]
    pub samples_needed: u32,
    #[serde(default = "default_capture_interval")]
    pub capture_interval: u32,
    #[serde(default = "default_status")]
    pub default_status: String,
    #[serde(default = "default_labels_file")]
    pub labels_file: String,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_confidence_threshold() -> f64 {
    100.0
}
fn default_samples_needed() -> u32 {
    30
}
fn default_capture_interval() -> u32 {
    10
}
fn default_status() -> String {
    "present".to_string()
}
fn default_labels_file() -> String {
    Config::config_dir()
        .join("labels.json")
        .to_string_lossy()
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            confidence_threshold: default_confidence_threshold(),
            samples_needed: default_samples_needed(),
            capture_interval: default_capture_interval(),
            default_status: default_status(),
            labels_file: default_labels_file(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory (`~/.rollcall`)
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rollcall")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rollcall.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rollcall.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        Ok(cfg)
    }

    /// Status applied by `mark` when none is given on the command line.
    pub fn default_attendance_status(&self) -> AppResult<AttendanceStatus> {
        AttendanceStatus::from_code(&self.default_status).ok_or_else(|| {
            AppError::Config(format!(
                "default_status must be present, absent or late (found '{}')",
                self.default_status
            ))
        })
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let mut file = fs::File::create(path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// Initialize configuration and database files.
    /// Returns the database path that was configured.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<String> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            config.save_to(&Self::config_file())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(config.database)
    }
}
