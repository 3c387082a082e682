//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.skillmatrix.toml` files.

use crate::analysis::{Thresholds, GAP_THRESHOLD, STRENGTH_THRESHOLD};
use crate::store::DEFAULT_DATA_FILE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".skillmatrix.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Headline thresholds.
    #[serde(default)]
    pub thresholds: ThresholdConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Path of the JSON dataset.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            verbose: false,
        }
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

/// Team-average thresholds for gaps, strengths and status bands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Averages below this are gaps.
    #[serde(default = "default_gap")]
    pub gap: f64,

    /// Averages at or above this are strengths.
    #[serde(default = "default_strength")]
    pub strength: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            gap: default_gap(),
            strength: default_strength(),
        }
    }
}

fn default_gap() -> f64 {
    GAP_THRESHOLD
}

fn default_strength() -> f64 {
    STRENGTH_THRESHOLD
}

impl From<&ThresholdConfig> for Thresholds {
    fn from(config: &ThresholdConfig) -> Self {
        Self {
            gap: config.gap,
            strength: config.strength,
        }
    }
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Maximum skills listed per bucket in development profiles.
    #[serde(default = "default_max_skills")]
    pub max_skills_per_bucket: usize,

    /// Append the evaluation legend.
    #[serde(default = "default_true")]
    pub include_legend: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            max_skills_per_bucket: default_max_skills(),
            include_legend: true,
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("skills_report.md")
}

fn default_max_skills() -> usize {
    5
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Check value ranges that serde can't express.
    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        if !(0.0..=5.0).contains(&t.gap) || !(0.0..=5.0).contains(&t.strength) {
            anyhow::bail!("Thresholds must be between 0 and 5");
        }
        if t.gap > t.strength {
            anyhow::bail!(
                "Gap threshold ({}) must not exceed strength threshold ({})",
                t.gap,
                t.strength
            );
        }
        if self.report.max_skills_per_bucket == 0 {
            anyhow::bail!("report.max_skills_per_bucket must be at least 1");
        }
        Ok(())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.general.data_file = data.clone();
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Thresholds for the analysis layer.
    pub fn thresholds(&self) -> Thresholds {
        Thresholds::from(&self.thresholds)
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.data_file, PathBuf::from("data/database.json"));
        assert_eq!(config.thresholds.gap, 2.5);
        assert_eq!(config.thresholds.strength, 3.5);
        assert_eq!(config.report.max_skills_per_bucket, 5);
        assert!(config.report.include_legend);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
data_file = "team/skills.json"
verbose = true

[thresholds]
gap = 2.0

[report]
output = "q3_report.md"
include_legend = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.data_file, PathBuf::from("team/skills.json"));
        assert!(config.general.verbose);
        assert_eq!(config.thresholds.gap, 2.0);
        assert_eq!(config.thresholds.strength, 3.5);
        assert_eq!(config.report.output, PathBuf::from("q3_report.md"));
        assert!(!config.report.include_legend);
        assert_eq!(config.thresholds().gap, 2.0);
    }

    #[test]
    fn test_invalid_thresholds() {
        let mut config = Config::default();
        config.thresholds.gap = 4.0;
        config.thresholds.strength = 3.0;
        assert!(config.validate().is_err());

        config.thresholds.gap = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[thresholds]"));
        assert!(toml_str.contains("[report]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.report.max_skills_per_bucket, 5);
    }
}
