//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Root of the channel, proposal and diagnostic logs
    pub directory: PathBuf,
    /// Write diagnostic output to `<directory>/eunomia.log` as well as stderr
    pub file: bool,
    /// JSONL governance event log, relative to `directory`
    pub events_file: Option<String>,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            file: true,
            events_file: None,
        }
    }
}

impl FileLoggingConfig {
    pub fn events_path(&self) -> Option<PathBuf> {
        self.events_file
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(|name| self.directory.join(name))
    }
}
