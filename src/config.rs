use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::insights::InsightSettings;
use crate::logging::LogConfig;
use crate::report::OutputFormat;
use crate::window::{Clock, FixedClock, SystemClock};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Window navigation settings
    pub window: WindowSettings,

    /// Terminal output settings
    pub display: DisplaySettings,

    /// Insight analysis thresholds
    pub insights: InsightSettings,

    /// Logging settings
    pub logging: LogConfig,
}

/// Window navigation settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Pin "today" to a fixed date instead of the local calendar date
    pub today_override: Option<NaiveDate>,
}

/// Terminal output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Format used when `--format` is not given
    pub default_format: OutputFormat,

    /// Colorize terminal output
    pub color: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            default_format: OutputFormat::Text,
            color: true,
        }
    }
}

/// Clock selected by the window settings
#[derive(Debug, Clone, Copy)]
pub enum ConfiguredClock {
    System(SystemClock),
    Fixed(FixedClock),
}

impl Clock for ConfiguredClock {
    fn today(&self) -> NaiveDate {
        match self {
            ConfiguredClock::System(clock) => clock.today(),
            ConfiguredClock::Fixed(clock) => clock.today(),
        }
    }
}

impl WindowSettings {
    pub fn clock(&self) -> ConfiguredClock {
        match self.today_override {
            Some(date) => ConfiguredClock::Fixed(FixedClock(date)),
            None => ConfiguredClock::System(SystemClock),
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".healthweek")
            .join("config.toml")
    }

    /// Load configuration from the default path, falling back to defaults
    pub fn load_or_default() -> Self {
        let config_path = Self::default_config_path();

        if !config_path.exists() {
            return Self::default();
        }

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!(
                    "Ignoring unreadable config {}: {:#}",
                    config_path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load an explicit config file, or the default location when none is given
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::load_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use tempfile::tempdir;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_config() {
        let config: AppConfig = toml::from_str(
            r#"
            [window]
            today_override = "2024-05-07"

            [insights]
            sleep_target_minutes = 450.0

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.window.today_override, NaiveDate::from_ymd_opt(2024, 5, 7));
        assert_eq!(config.insights.sleep_target_minutes, 450.0);
        assert_eq!(config.insights.low_recovery, 33.0);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(config.display.color);
    }

    #[test]
    fn test_configured_clock() {
        let settings = WindowSettings {
            today_override: NaiveDate::from_ymd_opt(2024, 5, 7),
        };
        assert_eq!(settings.clock().today(), NaiveDate::from_ymd_opt(2024, 5, 7).unwrap());
        assert!(matches!(
            WindowSettings::default().clock(),
            ConfiguredClock::System(_)
        ));
    }

    #[test]
    fn test_config_file_io() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut original = AppConfig::default();
        original.display.default_format = OutputFormat::Json;
        original.display.color = false;

        original.save_to_file(&config_path).unwrap();
        let loaded = AppConfig::load_from_file(&config_path).unwrap();

        assert_eq!(loaded, original);
        assert_eq!(AppConfig::resolve(Some(&config_path)).unwrap(), original);
    }

    #[test]
    fn test_missing_file_is_error() {
        let temp_dir = tempdir().unwrap();
        let result = AppConfig::load_from_file(temp_dir.path().join("absent.toml"));
        assert!(result.is_err());
    }
}
