//! `List` flattening
//!
//! A `kind: List` document is an aggregate whose `items` are the actual
//! resources. Flattening goes one level deep only: a `List` found inside
//! `items` is handed on as a resource.

use super::fields::string_field;
use serde_yaml::Value;

/// Kind of the aggregate resource that embeds other resources in `items`
pub const LIST_KIND: &str = "List";

/// Resources contained in one document
#[derive(Debug)]
pub enum Flattened {
    /// A plain resource document
    Single(Option<Value>),
    /// The `items` of a `List`
    Items(std::vec::IntoIter<Value>),
}

impl Iterator for Flattened {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        match self {
            Flattened::Single(value) => value.take(),
            Flattened::Items(items) => items.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Flattened::Single(value) => {
                let n = usize::from(value.is_some());
                (n, Some(n))
            }
            Flattened::Items(items) => items.size_hint(),
        }
    }
}

/// Expand a document into the resources it holds
///
/// Missing or non-sequence `items` on a `List` yields no resources.
pub fn flatten(mut document: Value) -> Flattened {
    if string_field(&document, &["kind"]) != LIST_KIND {
        return Flattened::Single(Some(document));
    }

    match document.get_mut("items").map(std::mem::take) {
        Some(Value::Sequence(items)) => {
            tracing::debug!("Flattening List with {} items", items.len());
            Flattened::Items(items.into_iter())
        }
        _ => {
            tracing::debug!("List without items sequence, nothing to flatten");
            Flattened::Items(Vec::new().into_iter())
        }
    }
}
