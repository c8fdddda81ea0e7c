//! Default configuration values

use super::schema::Config;

/// Get the default configuration
pub fn default_config() -> Config {
    Config::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputMode;

    #[test]
    fn test_default_config() {
        let config = default_config();
        assert_eq!(config.output, OutputMode::Summary);
        assert!(!config.omit_kind);
    }
}
