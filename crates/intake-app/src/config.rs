//! Configuration management for incident-intake
//!
//! Config stored at: ~/.config/incident-intake/config.json

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use intake_types::{ConfigError, OutputFormat, Result};

const APP_DIR: &str = "incident-intake";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,

    /// Incident store directory override
    #[serde(default)]
    pub store_dir: Option<PathBuf>,

    /// Context hint applied when a command does not pass one
    #[serde(default)]
    pub default_hint: Option<String>,

    /// How far back `incidents notifications` looks
    #[serde(default = "default_notification_window")]
    pub notification_window_minutes: i64,
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_notification_window() -> i64 {
    24 * 60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_format: default_output_format(),
            store_dir: None,
            default_hint: None,
            notification_window_minutes: default_notification_window(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join(APP_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the incident store directory
    pub fn store_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.store_dir {
            return Ok(dir.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join(APP_DIR);
        Ok(data_dir)
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            Self::from_json(&content)
        } else {
            Ok(Config::default())
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveError(e.to_string()))?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Incident Intake Configuration")?;
        writeln!(f, "=============================")?;
        writeln!(f)?;
        writeln!(f, "Output format:        {}", self.output_format)?;
        writeln!(
            f,
            "Store dir:            {}",
            self.store_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(
            f,
            "Default hint:         {}",
            self.default_hint.as_deref().unwrap_or("(none)")
        )?;
        writeln!(
            f,
            "Notification window:  {} min",
            self.notification_window_minutes
        )?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:          {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_types::Error;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = Config::from_json(r#"{"output_format": "json"}"#).unwrap();
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.store_dir, None);
        assert_eq!(config.notification_window_minutes, 1440);
    }

    #[test]
    fn test_store_dir_override() {
        let config = Config {
            store_dir: Some(PathBuf::from("/tmp/incidents")),
            ..Config::default()
        };
        assert_eq!(config.store_dir().unwrap(), PathBuf::from("/tmp/incidents"));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = Config::from_json("{ nope").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_round_trip() {
        let config = Config {
            default_hint: Some("battery".to_string()),
            ..Config::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }
}
