//! Configuration file upgrades: detect keys added in newer releases and
//! write them back with their default values.

use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

const KNOWN_KEYS: [&str; 6] = [
    "database",
    "confidence_threshold",
    "samples_needed",
    "capture_interval",
    "default_status",
    "labels_file",
];

fn read_mapping(path: &Path) -> AppResult<Mapping> {
    let content = fs::read_to_string(path)?;
    let yaml: Value = serde_yaml::from_str(&content)?;
    Ok(yaml.as_mapping().cloned().unwrap_or_default())
}

/// Keys the file at `path` does not define.
pub fn missing_fields(path: &Path) -> AppResult<Vec<&'static str>> {
    let map = read_mapping(path)?;
    Ok(KNOWN_KEYS
        .iter()
        .copied()
        .filter(|k| !map.contains_key(Value::String(k.to_string())))
        .collect())
}

/// Rewrite the file with every missing key filled in.
///   Returns:
///   Ok(true)  → config updated
///   Ok(false) → no change needed
pub fn run_config_migrations(path: &Path) -> AppResult<bool> {
    if !path.exists() {
        info(format!("No configuration file at {}", path.display()));
        return Ok(false);
    }

    let missing = missing_fields(path)?;
    if missing.is_empty() {
        return Ok(false);
    }

    // serde defaults fill exactly the missing keys, existing values are kept
    let cfg = Config::load_from(path)?;
    cfg.save_to(path)?;

    success(format!(
        "Configuration upgraded, added: {}",
        missing.join(", ")
    ));
    Ok(true)
}
