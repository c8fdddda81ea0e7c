//! kgrep library
//!
//! Filters Kubernetes-style resources out of YAML streams. Documents are
//! decoded lazily, `List` aggregates are flattened one level, and each
//! resource accepted by a [`Selector`] is written in the requested
//! [`OutputMode`].

pub mod cli;
pub mod config;
pub mod decode;
pub mod grep;
pub mod output;
pub mod resource;
pub mod selector;

// Re-export commonly used types for convenience
pub use decode::{DecodeError, YamlDocuments};
pub use grep::{grep_resources, GrepError, GrepOptions, GrepStats};
pub use output::{write_resource, FormatError, FormatOptions, OutputMode};
pub use resource::{flatten, ResourceRef};
pub use selector::{LabelSelector, MatchMode, Requirement, Selector, SelectorError};
