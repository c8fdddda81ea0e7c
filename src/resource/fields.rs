//! Optional-field access on generic YAML trees
//!
//! Every read of resource metadata goes through these helpers so that absent
//! or mistyped fields behave the same way everywhere.

use serde_yaml::{Mapping, Value};

/// Walk nested mapping keys, returning `None` as soon as a key is missing or
/// an intermediate value is not a mapping
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(*key))
}

/// String at `path`, or `""` when absent or not a string
pub fn string_field<'a>(value: &'a Value, path: &[&str]) -> &'a str {
    lookup(value, path).and_then(Value::as_str).unwrap_or("")
}

/// Mapping at `path`, if present
pub fn mapping_field<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Mapping> {
    lookup(value, path).and_then(Value::as_mapping)
}
