//! FILENAME: app/src/config.rs
// PURPOSE: Dashboard configuration loaded from JSON.
// CONTEXT: Every key is optional; missing sections fall back to defaults so an
// empty object is a valid configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use view_engine::AggregationPolicy;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown log level: {0}")]
    LogLevel(String),

    #[error("Invalid anchor date '{0}', expected YYYY-MM-DD")]
    AnchorDate(String),

    #[error("Page size must be at least 1")]
    PageSize,

    #[error("Failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// SECTIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error, off.
    pub level: String,
    /// Optional log file, truncated on startup.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> Result<log::LevelFilter, ConfigError> {
        self.level
            .trim()
            .parse::<log::LevelFilter>()
            .map_err(|_| ConfigError::LogLevel(self.level.clone()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Overrides the build-dependent default when set.
    pub aggregation_policy: Option<AggregationPolicy>,
}

impl EngineConfig {
    pub fn policy(&self) -> AggregationPolicy {
        self.aggregation_policy.unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScreensConfig {
    pub page_size: usize,
    /// Seed for chart series and sample status assignment.
    pub seed: u64,
    /// Date the chart labels end at. Today when absent.
    pub anchor_date: Option<String>,
}

impl Default for ScreensConfig {
    fn default() -> Self {
        ScreensConfig {
            page_size: 10,
            seed: 42,
            anchor_date: None,
        }
    }
}

impl ScreensConfig {
    pub fn anchor(&self) -> Result<NaiveDate, ConfigError> {
        match &self.anchor_date {
            Some(text) => NaiveDate::parse_from_str(text.trim(), records::DATE_FORMAT)
                .map_err(|_| ConfigError::AnchorDate(text.clone())),
            None => Ok(chrono::Local::now().date_naive()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemindersConfig {
    pub timeout_ms: u64,
    /// Latency of the simulated dispatcher.
    pub simulated_delay_ms: u64,
}

impl Default for RemindersConfig {
    fn default() -> Self {
        RemindersConfig {
            timeout_ms: 3000,
            simulated_delay_ms: 500,
        }
    }
}

impl RemindersConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }
}

// ============================================================================
// ROOT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardConfig {
    pub logging: LoggingConfig,
    pub engine: EngineConfig,
    pub screens: ScreensConfig,
    pub reminders: RemindersConfig,
}

impl DashboardConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks the values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging.level_filter()?;
        self.screens.anchor()?;
        if self.screens.page_size == 0 {
            return Err(ConfigError::PageSize);
        }
        Ok(())
    }
}
