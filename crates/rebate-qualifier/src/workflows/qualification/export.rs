use super::domain::Scenario;
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Indented JSON rendition of a scenario plus the file name it is saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioExport {
    pub file_name: String,
    pub body: String,
}

impl ScenarioExport {
    pub fn new(
        scenario: &Scenario,
        exported_at: DateTime<Utc>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            file_name: export_file_name(&scenario.name, exported_at),
            body: serde_json::to_string_pretty(scenario)?,
        })
    }

    pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.body)?;
        Ok(path)
    }
}

/// `<name with whitespace runs as underscores>_<unix millis>.json`
pub fn export_file_name(name: &str, exported_at: DateTime<Utc>) -> String {
    let mut stem = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                stem.push('_');
            }
            in_whitespace = true;
        } else {
            stem.push(ch);
            in_whitespace = false;
        }
    }
    format!("{stem}_{}.json", exported_at.timestamp_millis())
}
