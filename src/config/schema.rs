//! Configuration schema definitions
//!
//! Defines the structure of configuration files using serde for serialization.

use crate::output::OutputMode;
use crate::selector::MatchMode;
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Output mode used when `--output` is not given
    #[serde(default)]
    pub output: OutputMode,

    /// How kind/name/namespace filters compare (exact or regex)
    #[serde(default)]
    pub match_mode: MatchMode,

    /// Drop the `Kind/` prefix from line output
    #[serde(default = "default_false")]
    pub omit_kind: bool,

    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerConfig,
}

/// Logger configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoggerConfig {
    /// `EnvFilter` directive used with `--debug` when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_false() -> bool {
    false
}

fn default_log_level() -> String {
    "debug".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputMode::default(),
            match_mode: MatchMode::default(),
            omit_kind: default_false(),
            logger: LoggerConfig::default(),
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.output, OutputMode::Summary);
        assert_eq!(config.match_mode, MatchMode::Exact);
        assert!(!config.omit_kind);
        assert_eq!(config.logger.level, "debug");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("output: summary"));
        assert!(yaml.contains("matchMode: exact"));
        assert!(yaml.contains("omitKind"));
    }

    #[test]
    fn test_config_deserialization() {
        let yaml = r#"
output: yaml
matchMode: regex
logger:
  level: kgrep=trace
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.output, OutputMode::Yaml);
        assert_eq!(config.match_mode, MatchMode::Regex);
        assert!(!config.omit_kind);
        assert_eq!(config.logger.level, "kgrep=trace");
    }

    #[test]
    fn test_config_rejects_unknown_mode() {
        assert!(serde_yaml::from_str::<Config>("output: table\n").is_err());
    }
}
