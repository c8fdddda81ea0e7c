//! Output formatting for matched resources
//!
//! Every mode reads resource identity through [`ResourceRef`], so missing
//! metadata renders as empty strings rather than failing.

use crate::resource::ResourceRef;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode resource as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to encode resource as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown output mode {0:?} (expected summary, name, yaml or json)")]
    UnknownMode(String),
}

/// Output representation of a matched resource
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// `Kind/Name.Namespace`, one line per resource
    #[default]
    Summary,
    /// `Kind/Name`, one line per resource
    Name,
    /// The resource as a YAML document, `---` separated
    Yaml,
    /// The resource as one line of JSON
    Json,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Summary => "summary",
            OutputMode::Name => "name",
            OutputMode::Yaml => "yaml",
            OutputMode::Json => "json",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summary" => Ok(OutputMode::Summary),
            "name" => Ok(OutputMode::Name),
            "yaml" => Ok(OutputMode::Yaml),
            "json" => Ok(OutputMode::Json),
            other => Err(FormatError::UnknownMode(other.to_string())),
        }
    }
}

/// Rendering toggles shared by the line-based modes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Drop the `Kind/` prefix in `Summary` and `Name` lines
    pub omit_kind: bool,
}

/// Write one resource to `out` in the given mode
pub fn write_resource<W: Write + ?Sized>(
    mode: OutputMode,
    resource: &Value,
    out: &mut W,
    options: &FormatOptions,
) -> Result<(), FormatError> {
    let view = ResourceRef::new(resource);
    match mode {
        OutputMode::Summary => {
            if options.omit_kind {
                writeln!(out, "{}.{}", view.name(), view.namespace())?;
            } else {
                writeln!(out, "{}/{}.{}", view.kind(), view.name(), view.namespace())?;
            }
        }
        OutputMode::Name => {
            if options.omit_kind {
                writeln!(out, "{}", view.name())?;
            } else {
                writeln!(out, "{}/{}", view.kind(), view.name())?;
            }
        }
        OutputMode::Yaml => {
            writeln!(out, "---")?;
            serde_yaml::to_writer(&mut *out, resource)?;
        }
        OutputMode::Json => {
            serde_json::to_writer(&mut *out, resource)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
