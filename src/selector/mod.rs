//! Resource selection
//!
//! A [`Selector`] bundles optional kind, name and namespace filters with a
//! [`LabelSelector`]. All dimensions present must hold; an absent dimension
//! matches anything, so `Selector::default()` matches every resource.

pub mod labels;

pub use labels::{LabelSelector, Requirement};

use crate::resource::ResourceRef;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::fmt;
use std::str::FromStr;

/// Selector errors
#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    #[error("invalid label selector {selector:?}: {reason}")]
    InvalidLabelSelector { selector: String, reason: String },

    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown match mode {0:?} (expected 'exact' or 'regex')")]
    UnknownMatchMode(String),
}

/// How kind, name and namespace filters compare against resource fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Whole-string equality
    #[default]
    Exact,
    /// Regular expression search (anchor with `^...$` for whole-string matches)
    Regex,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Exact => "exact",
            MatchMode::Regex => "regex",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(MatchMode::Exact),
            "regex" => Ok(MatchMode::Regex),
            other => Err(SelectorError::UnknownMatchMode(other.to_string())),
        }
    }
}

/// A compiled string filter
#[derive(Debug, Clone)]
pub enum StringMatcher {
    Exact(String),
    Pattern(Regex),
}

impl StringMatcher {
    pub fn new(filter: &str, mode: MatchMode) -> Result<Self, SelectorError> {
        match mode {
            MatchMode::Exact => Ok(StringMatcher::Exact(filter.to_string())),
            MatchMode::Regex => Regex::new(filter)
                .map(StringMatcher::Pattern)
                .map_err(|source| SelectorError::InvalidPattern {
                    pattern: filter.to_string(),
                    source,
                }),
        }
    }

    pub fn is_match(&self, actual: &str) -> bool {
        match self {
            StringMatcher::Exact(expected) => expected == actual,
            StringMatcher::Pattern(regex) => regex.is_match(actual),
        }
    }
}

impl fmt::Display for StringMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringMatcher::Exact(expected) => f.write_str(expected),
            StringMatcher::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

/// Immutable resource filter
#[derive(Debug, Clone, Default)]
pub struct Selector {
    kind: Option<StringMatcher>,
    name: Option<StringMatcher>,
    namespace: Option<StringMatcher>,
    labels: LabelSelector,
}

impl Selector {
    pub fn builder() -> SelectorBuilder {
        SelectorBuilder::default()
    }

    /// True when no dimension is set
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.name.is_none()
            && self.namespace.is_none()
            && self.labels.is_empty()
    }

    /// Whether a resource tree satisfies every dimension of the selector
    pub fn matches(&self, resource: &Value) -> bool {
        self.matches_ref(&ResourceRef::new(resource))
    }

    pub fn matches_ref(&self, resource: &ResourceRef<'_>) -> bool {
        fn dimension(filter: &Option<StringMatcher>, actual: &str) -> bool {
            filter.as_ref().is_none_or(|m| m.is_match(actual))
        }

        dimension(&self.kind, resource.kind())
            && dimension(&self.name, resource.name())
            && dimension(&self.namespace, resource.namespace())
            && self.labels.matches(resource)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("<all>");
        }
        let mut parts = Vec::new();
        if let Some(kind) = &self.kind {
            parts.push(format!("kind={}", kind));
        }
        if let Some(name) = &self.name {
            parts.push(format!("name={}", name));
        }
        if let Some(namespace) = &self.namespace {
            parts.push(format!("namespace={}", namespace));
        }
        if !self.labels.is_empty() {
            parts.push(format!("labels={}", self.labels));
        }
        f.write_str(&parts.join(" "))
    }
}

/// Builder for [`Selector`]
///
/// Empty strings leave a dimension unset.
#[derive(Debug, Clone, Default)]
pub struct SelectorBuilder {
    mode: MatchMode,
    kind: Option<String>,
    name: Option<String>,
    namespace: Option<String>,
    labels: LabelSelector,
}

impl SelectorBuilder {
    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = non_empty(kind.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = non_empty(name.into());
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = non_empty(namespace.into());
        self
    }

    pub fn labels(mut self, labels: LabelSelector) -> Self {
        self.labels = labels;
        self
    }

    /// Compile the filters
    pub fn build(self) -> Result<Selector, SelectorError> {
        let mode = self.mode;
        let compile = |filter: Option<String>| {
            filter
                .map(|f| StringMatcher::new(&f, mode))
                .transpose()
        };

        Ok(Selector {
            kind: compile(self.kind)?,
            name: compile(self.name)?,
            namespace: compile(self.namespace)?,
            labels: self.labels,
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
