//! Configuration file loading and parsing.
//!
//! The tracker reads optional settings from `<data dir>/config.toml`.
//! If no config file exists, every setting falls back to its default.

use anyhow::{Context, Result};
use chrono::Duration;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::search::{QuickSearchOptions, DEFAULT_LIMIT, DEFAULT_THRESHOLD};

pub const CONFIG_FILE: &str = "config.toml";

/// Root configuration structure loaded from `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackerConfig {
    /// Quick search tuning (optional).
    pub search: Option<SearchConfig>,
    /// Derived notification thresholds (optional).
    pub notifications: Option<NotificationsConfig>,
    /// Export destination (optional).
    pub export: Option<ExportConfig>,
}

/// Quick search configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchConfig {
    /// Minimum score a hit must exceed (default: 0.3).
    pub threshold: Option<f64>,
    /// Maximum number of hits (default: 5).
    pub limit: Option<usize>,
}

impl SearchConfig {
    pub fn threshold(&self) -> f64 {
        self.threshold.unwrap_or(DEFAULT_THRESHOLD)
    }

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    pub fn options(&self) -> QuickSearchOptions {
        QuickSearchOptions {
            threshold: self.threshold(),
            limit: self.limit(),
        }
    }
}

/// Notification thresholds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationsConfig {
    /// Critical issues detected within this many minutes raise an alert (default: 10).
    pub recent_window_minutes: Option<i64>,
    /// Warn when the total issue count exceeds this (default: 50).
    pub high_issue_count: Option<usize>,
    /// Maximum notifications kept (default: 20).
    pub max: Option<usize>,
}

impl NotificationsConfig {
    pub fn recent_window_minutes(&self) -> i64 {
        self.recent_window_minutes.unwrap_or(10)
    }

    /// The recent window as a duration.
    ///
    /// Negative windows and windows too large to represent are rejected.
    pub fn recent_window(&self) -> Result<Duration> {
        let minutes = self.recent_window_minutes();
        if minutes < 0 {
            anyhow::bail!(
                "Invalid recent_window_minutes: {}. Must be zero or positive",
                minutes
            );
        }
        Duration::try_minutes(minutes).with_context(|| {
            format!("Invalid recent_window_minutes: {}. Value is too large", minutes)
        })
    }

    pub fn high_issue_count(&self) -> usize {
        self.high_issue_count.unwrap_or(50)
    }

    pub fn max(&self) -> usize {
        self.max.unwrap_or(20)
    }
}

/// Export configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportConfig {
    /// Directory export files are written to (default: current directory).
    pub output_dir: Option<PathBuf>,
}

impl ExportConfig {
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl TrackerConfig {
    /// Load configuration from `<root>/config.toml` if it exists.
    ///
    /// Returns an empty config (all sections None) if the file doesn't exist.
    /// Returns an error if the file exists but is malformed.
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_FILE);

        if !config_path.exists() {
            return Ok(TrackerConfig::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: TrackerConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        config
            .notifications()
            .recent_window()
            .with_context(|| format!("Invalid [notifications] in {}", config_path.display()))?;

        Ok(config)
    }

    pub fn search(&self) -> SearchConfig {
        self.search.clone().unwrap_or_default()
    }

    pub fn notifications(&self) -> NotificationsConfig {
        self.notifications.clone().unwrap_or_default()
    }

    pub fn export(&self) -> ExportConfig {
        self.export.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = TrackerConfig::load(temp.path()).unwrap();

        assert_eq!(config.search().threshold(), 0.3);
        assert_eq!(config.search().limit(), 5);
        assert_eq!(config.notifications().recent_window_minutes(), 10);
        assert_eq!(config.notifications().high_issue_count(), 50);
        assert_eq!(config.notifications().max(), 20);
        assert_eq!(config.export().output_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_parse_partial_config() {
        let config: TrackerConfig = toml::from_str(
            r#"
[search]
limit = 10

[export]
output_dir = "reports"
"#,
        )
        .unwrap();

        assert_eq!(config.search().limit(), 10);
        assert_eq!(config.search().threshold(), 0.3);
        assert_eq!(config.export().output_dir(), PathBuf::from("reports"));
        assert!(config.notifications.is_none());
    }

    #[test]
    fn test_negative_recent_window_is_rejected() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILE),
            "[notifications]\nrecent_window_minutes = -5\n",
        )
        .unwrap();

        let err = TrackerConfig::load(temp.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Must be zero or positive"));
    }

    #[test]
    fn test_oversized_recent_window_is_rejected() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILE),
            "[notifications]\nrecent_window_minutes = 9223372036854775807\n",
        )
        .unwrap();

        let err = TrackerConfig::load(temp.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("too large"));

        let config = NotificationsConfig {
            recent_window_minutes: Some(i64::MAX),
            ..Default::default()
        };
        assert!(config.recent_window().is_err());
    }

    #[test]
    fn test_zero_recent_window_is_accepted() {
        let config = NotificationsConfig {
            recent_window_minutes: Some(0),
            ..Default::default()
        };
        assert_eq!(config.recent_window().unwrap(), Duration::zero());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(CONFIG_FILE), "[search\nlimit = ").unwrap();

        let err = TrackerConfig::load(temp.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
