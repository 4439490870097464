//! Host-side configuration for the liftrs CLI
//!
//! The engine itself never reads configuration files; it receives plain
//! values and tables. This module is the host layer that loads those
//! values from TOML and hands them to the engine.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::adherence::DEFAULT_SERIES_WEEKS;
use crate::logging::LogConfig;
use crate::models::MuscleGroup;
use crate::recovery::RecoveryTable;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration metadata
    pub metadata: ConfigMetadata,

    /// Analysis defaults
    pub analysis: AnalysisSettings,

    /// Recovery window overrides
    pub recovery: RecoverySettings,

    /// Logging configuration
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Analysis defaults passed to the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Count incomplete sets toward daily set totals
    pub include_incomplete_sets: bool,

    /// Weeks shown in the adherence trend series
    pub adherence_window_weeks: usize,

    /// Default aggregation period length in days
    pub default_period_days: u32,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            include_incomplete_sets: false,
            adherence_window_weeks: DEFAULT_SERIES_WEEKS,
            default_period_days: 84,
        }
    }
}

/// Recovery window overrides, hours per muscle group name
/// (e.g. `chest = 36`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecoverySettings {
    pub hour_overrides: BTreeMap<String, i64>,
}

impl RecoverySettings {
    /// Materialize the recovery table the engine consumes.
    ///
    /// Unknown muscle names are caught by [`AppConfig::validate`], so they
    /// are simply skipped here.
    pub fn table(&self) -> RecoveryTable {
        let overrides: BTreeMap<MuscleGroup, i64> = self
            .hour_overrides
            .iter()
            .filter_map(|(name, hours)| name.parse::<MuscleGroup>().ok().map(|m| (m, *hours)))
            .collect();
        RecoveryTable::with_overrides(&overrides)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();
        AppConfig {
            metadata: ConfigMetadata {
                version: "1".to_string(),
                created_at: now,
                updated_at: now,
            },
            analysis: AnalysisSettings::default(),
            recovery: RecoverySettings::default(),
            logging: LogConfig::default(),
        }
    }
}

impl AppConfig {
    /// Default config file location under the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("liftrs").join("config.toml"))
    }

    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Reject settings the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.analysis.adherence_window_weeks == 0 {
            anyhow::bail!("adherence_window_weeks must be at least 1");
        }
        if self.analysis.default_period_days == 0 {
            anyhow::bail!("default_period_days must be at least 1");
        }
        for (name, hours) in &self.recovery.hour_overrides {
            if name.parse::<MuscleGroup>().is_err() {
                anyhow::bail!("unknown muscle group in recovery overrides: {}", name);
            }
            if *hours <= 0 {
                anyhow::bail!("recovery hours for {} must be positive", name);
            }
        }
        Ok(())
    }
}
