//! Configuration types.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub vault: VaultConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Construction parameters for one vault.
#[derive(Debug, Clone, Deserialize)]
pub struct VaultConfig {
    /// Root of the document tree managed by the engine.
    pub base_dir: PathBuf,
    /// Subdirectory (under `base_dir`) where new notes are created.
    #[serde(default = "default_notes_dir")]
    pub notes_dir: String,
    /// Well-known file (under `base_dir`) new tasks are appended to.
    #[serde(default = "default_tasks_file")]
    pub tasks_file: String,
    /// Hour of day (0-23) for due-task notifications.
    #[serde(default = "default_notification_hour")]
    pub notification_hour: u8,
    /// Run mutations through the background pipeline instead of inline.
    #[serde(default)]
    pub async_mutations: bool,
}

impl VaultConfig {
    /// Minimal config rooted at `base_dir`, all defaults otherwise.
    pub fn rooted_at(base_dir: impl Into<PathBuf>) -> Self {
        VaultConfig {
            base_dir: base_dir.into(),
            notes_dir: default_notes_dir(),
            tasks_file: default_tasks_file(),
            notification_hour: default_notification_hour(),
            async_mutations: false,
        }
    }

    /// Absolute path of the notes subdirectory.
    pub fn notes_path(&self) -> PathBuf {
        self.base_dir.join(&self.notes_dir)
    }

    /// Absolute path of the shared tasks file.
    pub fn tasks_file_path(&self) -> PathBuf {
        self.base_dir.join(&self.tasks_file)
    }
}

fn default_notes_dir() -> String {
    "Unsorted".to_string()
}

fn default_tasks_file() -> String {
    "UnsortedTasks.md".to_string()
}

fn default_notification_hour() -> u8 {
    9
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
