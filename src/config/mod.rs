//! Configuration for kgrep
//!
//! Layered settings: built-in defaults, the root config file, then
//! environment overrides. Command-line flags win over all of them.

mod defaults;
pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{Config, LoggerConfig};

use anyhow::Context;

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &Config, key: &str) -> anyhow::Result<String> {
    match key {
        "output" => Ok(config.output.to_string()),
        "matchMode" => Ok(config.match_mode.to_string()),
        "omitKind" => Ok(config.omit_kind.to_string()),
        "logger.level" => Ok(config.logger.level.clone()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

/// Set a configuration value by key (dot notation)
pub fn set_config_value(config: &mut Config, key: &str, value: &str) -> anyhow::Result<()> {
    match key {
        "output" => {
            config.output = value
                .parse()
                .context("output must be one of summary, name, yaml, json")?;
        }
        "matchMode" => {
            config.match_mode = value
                .parse()
                .context("matchMode must be 'exact' or 'regex'")?;
        }
        "omitKind" => {
            config.omit_kind = value
                .parse()
                .context("omitKind must be 'true' or 'false'")?;
        }
        "logger.level" => {
            config.logger.level = value.to_string();
        }
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }

    Ok(())
}
