//! Kubernetes label selectors
//!
//! Supports the equality-based and set-based forms accepted by `kubectl -l`:
//!
//! - `key` / `!key` - key present / absent
//! - `key=value`, `key==value` - key present with that value
//! - `key!=value` - key absent or with a different value
//! - `key in (a,b)` / `key notin (a,b)` - value in / not in the set
//!
//! Requirements are separated by commas and must all hold.

use super::SelectorError;
use crate::resource::ResourceRef;
use std::fmt;

/// A single label requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    Exists(String),
    NotExists(String),
    Equals(String, String),
    NotEquals(String, String),
    In(String, Vec<String>),
    NotIn(String, Vec<String>),
}

impl Requirement {
    pub fn key(&self) -> &str {
        match self {
            Requirement::Exists(key)
            | Requirement::NotExists(key)
            | Requirement::Equals(key, _)
            | Requirement::NotEquals(key, _)
            | Requirement::In(key, _)
            | Requirement::NotIn(key, _) => key,
        }
    }

    /// Evaluate against the label value (`None` when the key is absent)
    pub fn matches(&self, actual: Option<&str>) -> bool {
        match self {
            Requirement::Exists(_) => actual.is_some(),
            Requirement::NotExists(_) => actual.is_none(),
            Requirement::Equals(_, expected) => actual == Some(expected.as_str()),
            Requirement::NotEquals(_, expected) => actual != Some(expected.as_str()),
            Requirement::In(_, values) => actual.is_some_and(|a| values.iter().any(|v| v == a)),
            Requirement::NotIn(_, values) => !actual.is_some_and(|a| values.iter().any(|v| v == a)),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Exists(key) => write!(f, "{}", key),
            Requirement::NotExists(key) => write!(f, "!{}", key),
            Requirement::Equals(key, value) => write!(f, "{}={}", key, value),
            Requirement::NotEquals(key, value) => write!(f, "{}!={}", key, value),
            Requirement::In(key, values) => write!(f, "{} in ({})", key, values.join(",")),
            Requirement::NotIn(key, values) => write!(f, "{} notin ({})", key, values.join(",")),
        }
    }
}

/// Conjunction of label requirements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelector {
    requirements: Vec<Requirement>,
}

impl LabelSelector {
    /// Parse `kubectl -l` syntax; an empty string selects everything
    pub fn parse(selector: &str) -> Result<Self, SelectorError> {
        let invalid = |reason: &str| SelectorError::InvalidLabelSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        };

        if selector.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut requirements = Vec::new();
        for term in split_terms(selector).ok_or_else(|| invalid("unbalanced parentheses"))? {
            requirements.push(parse_requirement(term.trim()).map_err(|reason| invalid(&reason))?);
        }

        Ok(Self { requirements })
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Whether every requirement holds for the resource's labels
    pub fn matches(&self, resource: &ResourceRef<'_>) -> bool {
        self.requirements
            .iter()
            .all(|r| r.matches(resource.label(r.key())))
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<String> = self.requirements.iter().map(|r| r.to_string()).collect();
        f.write_str(&terms.join(","))
    }
}

/// Split on top-level commas; `None` when parentheses do not balance
fn split_terms(selector: &str) -> Option<Vec<&str>> {
    let mut terms = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, c) in selector.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                terms.push(&selector[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return None;
    }
    terms.push(&selector[start..]);
    Some(terms)
}

fn parse_requirement(term: &str) -> Result<Requirement, String> {
    if term.is_empty() {
        return Err("empty requirement".to_string());
    }

    if let Some(key) = term.strip_prefix('!') {
        return Ok(Requirement::NotExists(validate_key(key.trim())?));
    }

    if let Some((key, value)) = term.split_once("!=") {
        return Ok(Requirement::NotEquals(
            validate_key(key.trim())?,
            validate_value(value.trim())?,
        ));
    }

    if let Some((key, value)) = term.split_once("==").or_else(|| term.split_once('=')) {
        return Ok(Requirement::Equals(
            validate_key(key.trim())?,
            validate_value(value.trim())?,
        ));
    }

    if let Some(open) = term.find('(') {
        let head = term[..open].trim();
        let (key, operator) = head
            .rsplit_once(char::is_whitespace)
            .ok_or_else(|| format!("expected 'in' or 'notin' in {:?}", term))?;
        let body = term[open + 1..]
            .strip_suffix(')')
            .ok_or_else(|| format!("expected ')' at end of {:?}", term))?;
        let values = body
            .split(',')
            .map(|v| validate_value(v.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        if values.iter().all(|v| v.is_empty()) {
            return Err(format!("empty value set in {:?}", term));
        }
        let key = validate_key(key.trim())?;
        return match operator {
            "in" => Ok(Requirement::In(key, values)),
            "notin" => Ok(Requirement::NotIn(key, values)),
            other => Err(format!("unknown operator {:?}", other)),
        };
    }

    Ok(Requirement::Exists(validate_key(term)?))
}

fn validate_key(key: &str) -> Result<String, String> {
    if key.is_empty() {
        return Err("empty label key".to_string());
    }
    if key
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '=' | '!' | '(' | ')' | ','))
    {
        return Err(format!("invalid label key {:?}", key));
    }
    Ok(key.to_string())
}

fn validate_value(value: &str) -> Result<String, String> {
    if value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '=' | '!' | '(' | ')' | ','))
    {
        return Err(format!("invalid label value {:?}", value));
    }
    Ok(value.to_string())
}
