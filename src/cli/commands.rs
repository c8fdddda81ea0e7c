//! CLI command handlers

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::config::{get_config_value, paths, set_config_value, ConfigLoader};

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get configuration value
    Get {
        /// Configuration key (e.g., "output", "logger.level")
        key: Option<String>,
    },
    /// Set configuration value
    Set {
        /// Configuration key (e.g., "output", "matchMode")
        key: String,
        /// Configuration value
        value: String,
    },
    /// List all configuration
    List,
    /// Show configuration file path
    Path,
    /// Validate configuration
    Validate,
}

/// Handle configuration subcommands
pub fn handle_config_command(cmd: ConfigSubcommand) -> Result<()> {
    match cmd {
        ConfigSubcommand::Get { key } => {
            // Load config (will use defaults if no file exists)
            let config = ConfigLoader::load().context("Failed to load configuration")?;

            if let Some(key) = key {
                let value = get_config_value(&config, &key)?;
                println!("{}", value);
            } else {
                let yaml =
                    serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
                print!("{}", yaml);
            }
        }
        ConfigSubcommand::Set { key, value } => {
            // Start from the file alone so env overrides are not persisted
            let root_path = paths::root_config_path();
            let mut config = if root_path.exists() {
                ConfigLoader::load_file(&root_path)?
            } else {
                ConfigLoader::load_defaults()
            };

            set_config_value(&mut config, &key, &value)
                .with_context(|| format!("Failed to set {} = {}", key, value))?;

            ConfigLoader::save_root(&config).context("Failed to save configuration")?;
            println!("Configuration saved");
        }
        ConfigSubcommand::List => {
            let config = ConfigLoader::load().context("Failed to load configuration")?;

            let yaml =
                serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
            print!("{}", yaml);
        }
        ConfigSubcommand::Path => {
            println!("{}", paths::root_config_path().display());
        }
        ConfigSubcommand::Validate => match ConfigLoader::validate() {
            Ok(()) => println!("Configuration is valid"),
            Err(e) => {
                eprintln!("Configuration validation failed: {:#}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
