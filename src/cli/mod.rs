//! CLI command handling module
//!
//! Handles the `config` and `version` subcommands and logging setup.

mod commands;
mod logging;
mod version;

pub use commands::{handle_config_command, ConfigSubcommand};
pub use logging::*;
pub use version::display_version;
