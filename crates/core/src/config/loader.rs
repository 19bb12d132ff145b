//! TOML config loading.

use std::fs;
use std::path::Path;

use thiserror::Error;

use super::types::ConfigFile;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(String),

    #[error("failed to read config file {0}: {1}")]
    ReadError(String, #[source] std::io::Error),

    #[error("failed to parse TOML in {0}: {1}")]
    ParseError(String, #[source] toml::de::Error),

    #[error("notification hour {0} out of range (expected 0-23)")]
    BadNotificationHour(u8),
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> Result<ConfigFile, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let s = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.display().to_string(), e))?;

        let cf: ConfigFile = toml::from_str(&s)
            .map_err(|e| ConfigError::ParseError(path.display().to_string(), e))?;

        if cf.vault.notification_hour > 23 {
            return Err(ConfigError::BadNotificationHour(cf.vault.notification_hour));
        }

        Ok(cf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("mdtasks.toml");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn loads_minimal_config_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[vault]
base_dir = "/tmp/vault"
"#,
        );

        let cf = ConfigLoader::load(&path).unwrap();
        assert_eq!(cf.vault.base_dir, PathBuf::from("/tmp/vault"));
        assert_eq!(cf.vault.notes_dir, "Unsorted");
        assert_eq!(cf.vault.tasks_file, "UnsortedTasks.md");
        assert_eq!(cf.vault.notification_hour, 9);
        assert!(!cf.vault.async_mutations);
        assert_eq!(cf.logging.level, "info");
    }

    #[test]
    fn loads_full_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[vault]
base_dir = "/tmp/vault"
notes_dir = "Inbox"
tasks_file = "Tasks.md"
notification_hour = 7
async_mutations = true

[logging]
level = "debug"
file = "/tmp/mdtasks.log"
"#,
        );

        let cf = ConfigLoader::load(&path).unwrap();
        assert_eq!(cf.vault.notes_dir, "Inbox");
        assert_eq!(cf.vault.tasks_file, "Tasks.md");
        assert_eq!(cf.vault.notification_hour, 7);
        assert!(cf.vault.async_mutations);
        assert_eq!(cf.logging.level, "debug");
        assert_eq!(cf.logging.file, Some(PathBuf::from("/tmp/mdtasks.log")));
    }

    #[test]
    fn missing_file_errors() {
        let err = ConfigLoader::load(Path::new("/nonexistent/mdtasks.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn bad_toml_errors() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "not toml at all [");
        let err = ConfigLoader::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_, _)));
    }

    #[test]
    fn notification_hour_is_validated() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[vault]
base_dir = "/tmp/vault"
notification_hour = 24
"#,
        );
        let err = ConfigLoader::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::BadNotificationHour(24)));
    }
}
