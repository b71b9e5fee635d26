//! CLI configuration management
//!
//! Handles loading and saving CLI-specific configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_CF_BINARY: &str = "CF_MARIADB_BACKUP_CF_BINARY";
const ENV_VERBOSE: &str = "CF_MARIADB_BACKUP_VERBOSE";
const ENV_COLOR: &str = "CF_MARIADB_BACKUP_COLOR";

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CliConfig {
    /// Path or name of the cf executable
    pub cf_binary: String,

    /// Enable debug logging by default
    pub verbose: bool,

    /// Colorize output
    pub color: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            cf_binary: "cf".to_string(),
            verbose: false,
            color: true,
        }
    }
}

fn parse_bool(value: &str) -> bool {
    value.to_lowercase() == "true" || value == "1"
}

impl CliConfig {
    /// Load configuration from `path`, or defaults if there is no such file
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).context("Failed to read CLI config file")?;
        toml::from_str(&content).context("Failed to parse CLI config file")
    }

    /// Save configuration to `path`, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize CLI config")?;
        std::fs::write(path, content).context("Failed to write CLI config file")?;

        Ok(())
    }

    /// Get the default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine config directory"))?;

        Ok(config_dir.join("cf-mariadb-backup").join("cli.toml"))
    }

    /// Set a single key from its textual value
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "cf_binary" => {
                ConfigBuilder::validate_cf_binary(value)?;
                self.cf_binary = value.to_string();
            }
            "verbose" => self.verbose = parse_bool(value),
            "color" => self.color = parse_bool(value),
            _ => return Err(anyhow::anyhow!("Unknown config key: {}", key)),
        }
        Ok(())
    }

    /// Create a new builder for constructing configuration
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for CLI configuration with validation and priority chain support
///
/// Priority chain (lowest to highest):
/// 1. Defaults
/// 2. Config file
/// 3. Environment variables
/// 4. CLI arguments
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    cf_binary: Option<String>,
    verbose: Option<bool>,
    color: Option<bool>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cf executable (with validation)
    pub fn with_cf_binary(mut self, binary: impl Into<String>) -> Result<Self> {
        let binary = binary.into();
        Self::validate_cf_binary(&binary)?;
        self.cf_binary = Some(binary);
        Ok(self)
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = Some(color);
        self
    }

    /// Load configuration from file; `None` skips the file
    pub fn with_config_file(self, path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Ok(self.merge(CliConfig::load_from(path)?)),
            None => Ok(self),
        }
    }

    // Values set on the builder win over the file
    fn merge(self, config: CliConfig) -> Self {
        Self {
            cf_binary: self.cf_binary.or(Some(config.cf_binary)),
            verbose: self.verbose.or(Some(config.verbose)),
            color: self.color.or(Some(config.color)),
        }
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(binary) = std::env::var(ENV_CF_BINARY) {
            if Self::validate_cf_binary(&binary).is_ok() {
                self.cf_binary = Some(binary);
            }
        }

        if let Ok(verbose) = std::env::var(ENV_VERBOSE) {
            self.verbose = Some(parse_bool(&verbose));
        }

        if let Ok(color) = std::env::var(ENV_COLOR) {
            self.color = Some(parse_bool(&color));
        }

        self
    }

    /// Build the final configuration with validation
    pub fn build(self) -> Result<CliConfig> {
        let defaults = CliConfig::default();

        let cf_binary = self.cf_binary.unwrap_or(defaults.cf_binary);
        Self::validate_cf_binary(&cf_binary)?;

        Ok(CliConfig {
            cf_binary,
            verbose: self.verbose.unwrap_or(defaults.verbose),
            color: self.color.unwrap_or(defaults.color),
        })
    }

    fn validate_cf_binary(binary: &str) -> Result<()> {
        if binary.trim().is_empty() {
            return Err(anyhow::anyhow!("cf binary cannot be empty"));
        }
        Ok(())
    }
}
