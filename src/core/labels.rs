use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Classifier label id → student name, persisted next to the trained model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelMap {
    labels: BTreeMap<i32, String>,
}

impl LabelMap {
    /// Assign ids 0.. in order of first appearance, the same order the
    /// training set is labelled in.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = LabelMap::default();
        for name in names {
            map.insert(name.as_ref());
        }
        map
    }

    /// Id of `name`, adding it with the next free id when missing.
    pub fn insert(&mut self, name: &str) -> i32 {
        if let Some(id) = self.id_of(name) {
            return id;
        }
        let next = self.labels.keys().next_back().map(|k| k + 1).unwrap_or(0);
        self.labels.insert(next, name.to_string());
        next
    }

    pub fn name_of(&self, label_id: i32) -> Option<&str> {
        self.labels.get(&label_id).map(String::as_str)
    }

    pub fn id_of(&self, name: &str) -> Option<i32> {
        self.labels
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Missing file → empty map.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(LabelMap::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
