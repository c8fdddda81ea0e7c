//! Resource views over decoded YAML documents
//!
//! A resource is never copied out of its document: [`ResourceRef`] borrows the
//! tree and reads `kind` and `metadata` through the optional-field helpers in
//! [`fields`], so missing fields degrade to empty values instead of errors.

pub mod fields;
pub mod flatten;

pub use fields::{lookup, mapping_field, string_field};
pub use flatten::{flatten, Flattened, LIST_KIND};

use serde_yaml::Value;

/// Borrowed Kubernetes-style view of a document tree
#[derive(Debug, Clone, Copy)]
pub struct ResourceRef<'a> {
    value: &'a Value,
}

impl<'a> ResourceRef<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    /// `kind`, or `""` when absent
    pub fn kind(&self) -> &'a str {
        string_field(self.value, &["kind"])
    }

    /// `apiVersion`, or `""` when absent
    pub fn api_version(&self) -> &'a str {
        string_field(self.value, &["apiVersion"])
    }

    /// `metadata.name`, or `""` when absent
    pub fn name(&self) -> &'a str {
        string_field(self.value, &["metadata", "name"])
    }

    /// `metadata.namespace`, or `""` when absent (cluster-scoped resources)
    pub fn namespace(&self) -> &'a str {
        string_field(self.value, &["metadata", "namespace"])
    }

    /// Value of a single label, if present and a string
    pub fn label(&self, key: &str) -> Option<&'a str> {
        lookup(self.value, &["metadata", "labels", key]).and_then(Value::as_str)
    }

    /// Labels as string pairs; empty when `metadata.labels` is absent
    pub fn labels(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        string_pairs(mapping_field(self.value, &["metadata", "labels"]))
    }

    /// Value of a single annotation, if present and a string
    pub fn annotation(&self, key: &str) -> Option<&'a str> {
        lookup(self.value, &["metadata", "annotations", key]).and_then(Value::as_str)
    }

    /// Annotations as string pairs; empty when `metadata.annotations` is absent
    pub fn annotations(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        string_pairs(mapping_field(self.value, &["metadata", "annotations"]))
    }
}

fn string_pairs(
    mapping: Option<&serde_yaml::Mapping>,
) -> impl Iterator<Item = (&str, &str)> + '_ {
    mapping
        .into_iter()
        .flat_map(|m| m.iter())
        .filter_map(|(k, v)| Some((k.as_str()?, v.as_str()?)))
}
