// SPDX-License-Identifier: PMPL-1.0-or-later
//! Configuration handling for wcagbot
//!
//! Configuration is read from a TOML file (`wcagbot.toml` by default). Every
//! section is optional; missing sections and a missing file fall back to the
//! defaults below.

use crate::contrast::parse_color;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Contrast rule settings
    #[serde(default)]
    pub contrast: ContrastConfig,

    /// External audit collaborator settings
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Reject values the rules cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.contrast.min_ratio.is_finite() || self.contrast.min_ratio < 1.0 {
            return Err(Error::Config(format!(
                "contrast.min_ratio must be a number >= 1.0, got {}",
                self.contrast.min_ratio
            )));
        }
        if parse_color(&self.contrast.default_background).is_none() {
            return Err(Error::Config(format!(
                "contrast.default_background is not a color: {:?}",
                self.contrast.default_background
            )));
        }
        Ok(())
    }
}

/// Contrast rule configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContrastConfig {
    /// Minimum acceptable contrast ratio
    #[serde(default = "default_min_ratio")]
    pub min_ratio: f64,

    /// Background assumed when neither the element nor an ancestor declares one
    #[serde(default = "default_background")]
    pub default_background: String,
}

impl Default for ContrastConfig {
    fn default() -> Self {
        Self {
            min_ratio: default_min_ratio(),
            default_background: default_background(),
        }
    }
}

fn default_min_ratio() -> f64 {
    4.5
}

fn default_background() -> String {
    "rgb(255, 255, 255)".to_string()
}

/// External audit engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Seconds before a running audit is abandoned
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Program and arguments of a command-line audit engine
    #[serde(default)]
    pub command: Vec<String>,
}

impl AuditConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            command: Vec::new(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Level for the `wcagbot` target when `--verbose` is not given
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Load configuration from a TOML file, falling back to defaults when absent
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!("Config file not found at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;

    debug!(?config, "Loaded configuration");
    Ok(config)
}

/// Default config location, relative to the working directory
pub fn default_config_path() -> PathBuf {
    PathBuf::from("wcagbot.toml")
}
