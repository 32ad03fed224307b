use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::entry::LogLevel;
use crate::error::{LogsecError, Result};

use super::policy::{SanitizationConfig, ValidationConfig};

/// Top-level configuration, usually read from `.logsec/config.yml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub sanitization: SanitizationConfig,

    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub logger: LoggerConfig,
}

/// Where and what the file logger writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Directory holding one `<channel>.log` file per channel.
    pub directory: PathBuf,

    /// Channel used when an entry names none.
    pub default_channel: String,

    /// Entries below this level are dropped.
    pub min_level: LogLevel,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            default_channel: "app".into(),
            min_level: LogLevel::Debug,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file. Returns defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&contents).map_err(|e| LogsecError::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load settings from the project root. Checks `.logsec/config.yml`.
    pub fn load_project(project_root: &Path) -> Result<Self> {
        Self::load_from(&Self::project_path(project_root))
    }

    pub fn project_path(project_root: &Path) -> PathBuf {
        project_root.join(".logsec").join("config.yml")
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| LogsecError::ConfigParse {
            path: PathBuf::new(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load_project(tmp.path()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_partial_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yml");
        std::fs::write(
            &path,
            "logger:\n  default_channel: quotes\n  min_level: warning\nvalidation:\n  max_message_length: 10\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.logger.default_channel, "quotes");
        assert_eq!(settings.logger.min_level, LogLevel::Warning);
        assert_eq!(settings.validation.max_message_length, 10);
        assert_eq!(settings.sanitization.max_depth, 8);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yml");
        std::fs::write(&path, "logger: [not, a, map").unwrap();
        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, LogsecError::ConfigParse { .. }));
    }

    #[test]
    fn test_yaml_roundtrip_of_defaults() {
        let yaml = Settings::default().to_yaml().unwrap();
        let parsed: Settings = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, Settings::default());
    }
}
