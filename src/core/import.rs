//! Roster import: register the owners of collected face samples.

use crate::core::students::StudentLogic;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::student::NewStudent;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

// "Josh_0.jpg" → "Josh", "Mary_Ann_3.png" → "Mary_Ann"
static SAMPLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>.+)_[^_]*\.(?:jpg|png)$").expect("valid sample name regex")
});

/// Owner encoded in a sample file name, if the name follows `Name_N.ext`.
pub fn sample_owner(file_name: &str) -> Option<String> {
    SAMPLE_RE
        .captures(file_name)
        .and_then(|c| c.name("name"))
        .map(|m| m.as_str().to_string())
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ImportReport {
    pub added: Vec<String>,
    pub existing: Vec<String>,
    pub failed: Vec<(String, String)>,
}

pub struct ImportLogic;

impl ImportLogic {
    /// Distinct owners of the samples in `dir`, sorted.
    pub fn scan(dir: &Path) -> AppResult<BTreeSet<String>> {
        let mut names = BTreeSet::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(owner) = sample_owner(&entry.file_name().to_string_lossy()) {
                names.insert(owner);
            }
        }
        Ok(names)
    }

    /// Register every owner not yet in the ledger.
    pub fn from_samples(pool: &mut DbPool, dir: &Path) -> AppResult<ImportReport> {
        let names = Self::scan(dir)?;
        Self::register_all(pool, names)
    }

    pub fn register_all<I>(pool: &mut DbPool, names: I) -> AppResult<ImportReport>
    where
        I: IntoIterator<Item = String>,
    {
        let mut report = ImportReport::default();

        for name in names {
            if StudentLogic::find_by_name(pool, &name)?.is_some() {
                report.existing.push(name);
                continue;
            }

            match StudentLogic::add(pool, &NewStudent::named(&name)) {
                Ok(_) => report.added.push(name),
                Err(e) => report.failed.push((name, e.to_string())),
            }
        }

        audit(
            &pool.conn,
            "import",
            "students",
            &format!(
                "added {}, existing {}, failed {}",
                report.added.len(),
                report.existing.len(),
                report.failed.len()
            ),
        );

        Ok(report)
    }
}
