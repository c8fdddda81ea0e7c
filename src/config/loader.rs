//! Configuration loading and merging logic
//!
//! Handles loading configuration from multiple sources and merging them
//! according to precedence rules.

use super::{defaults, paths, schema::Config};
use anyhow::{Context, Result};
use std::path::Path;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers merged
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. Root config file
    /// 3. Built-in defaults
    ///
    /// Command-line flags are applied on top by the caller.
    pub fn load() -> Result<Config> {
        let mut config = Self::load_defaults();

        let root_path = paths::root_config_path();
        if root_path.exists() {
            let root_config = Self::load_file(&root_path)?;
            config = Self::merge_config(config, root_config);
        } else {
            tracing::debug!("No config file at {}", root_path.display());
        }

        Ok(Self::apply_env_overrides(config))
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!("Loaded config file {}", path.display());
        Ok(config)
    }

    /// Validate the root configuration file, if one exists
    ///
    /// Fails on invalid YAML syntax, invalid value types and read errors.
    pub fn validate() -> Result<()> {
        let root_path = paths::root_config_path();
        if root_path.exists() {
            Self::load_file(&root_path)?;
        }
        Ok(())
    }

    /// Load default configuration
    pub fn load_defaults() -> Config {
        defaults::default_config()
    }

    /// Merge two configurations, with `other` taking precedence
    ///
    /// Files are deserialized with serde defaults, so a file layer always
    /// carries a complete configuration.
    fn merge_config(_base: Config, other: Config) -> Config {
        Config {
            output: other.output,
            match_mode: other.match_mode,
            omit_kind: other.omit_kind,
            logger: other.logger,
        }
    }

    /// Apply environment variable overrides
    ///
    /// Unparseable values are ignored with a warning.
    fn apply_env_overrides(mut config: Config) -> Config {
        // KGREP_OUTPUT override
        if let Ok(output) = std::env::var("KGREP_OUTPUT") {
            match output.parse() {
                Ok(mode) => config.output = mode,
                Err(e) => tracing::warn!("Ignoring KGREP_OUTPUT: {}", e),
            }
        }

        // KGREP_MATCH_MODE override
        if let Ok(match_mode) = std::env::var("KGREP_MATCH_MODE") {
            match match_mode.parse() {
                Ok(mode) => config.match_mode = mode,
                Err(e) => tracing::warn!("Ignoring KGREP_MATCH_MODE: {}", e),
            }
        }

        // KGREP_OMIT_KIND override
        if let Ok(omit_kind) = std::env::var("KGREP_OMIT_KIND") {
            match omit_kind.parse::<bool>() {
                Ok(val) => config.omit_kind = val,
                Err(e) => tracing::warn!("Ignoring KGREP_OMIT_KIND: {}", e),
            }
        }

        config
    }

    /// Save configuration to a file
    pub fn save(config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }

        let yaml =
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")?;

        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Save root configuration
    pub fn save_root(config: &Config) -> Result<()> {
        Self::save(config, &paths::root_config_path())
    }
}
