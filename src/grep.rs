//! The resource grep pipeline
//!
//! Pulls documents from the YAML stream one at a time, flattens `List`
//! aggregates, and formats every resource the selector accepts. Nothing is
//! buffered beyond the document being processed.

use crate::decode::{DecodeError, YamlDocuments};
use crate::output::{write_resource, FormatError, FormatOptions, OutputMode};
use crate::resource::{flatten, ResourceRef};
use crate::selector::Selector;
use std::io::{BufReader, Read, Write};

/// Errors that abort a grep run
#[derive(Debug, thiserror::Error)]
pub enum GrepError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Format(#[from] FormatError),
}

impl GrepError {
    /// True when the output sink was closed by the reader (e.g. `| head`)
    pub fn is_broken_pipe(&self) -> bool {
        matches!(
            self,
            GrepError::Format(FormatError::Io(e)) if e.kind() == std::io::ErrorKind::BrokenPipe
        )
    }
}

/// Pipeline toggles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrepOptions {
    /// Emit the resources the selector rejects instead of those it accepts
    pub invert_match: bool,
    /// Drop the `Kind/` prefix in line-based output
    pub omit_kind: bool,
}

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrepStats {
    /// Non-empty documents decoded from the stream
    pub documents: usize,
    /// Resources after `List` flattening
    pub resources: usize,
    /// Resources written to the output
    pub matched: usize,
}

/// Filter the resources of a YAML stream into `output`
///
/// Stops at the first decode or write error; anything already written stays
/// written. Zero matches is not an error.
pub fn grep_resources<R: Read, W: Write>(
    selector: &Selector,
    input: R,
    mut output: W,
    mode: OutputMode,
    options: GrepOptions,
) -> Result<GrepStats, GrepError> {
    let format_options = FormatOptions {
        omit_kind: options.omit_kind,
    };
    let mut stats = GrepStats::default();

    tracing::debug!(
        "Grepping resources: selector={}, mode={}, invert={}",
        selector,
        mode,
        options.invert_match
    );

    for document in YamlDocuments::new(BufReader::new(input)) {
        let document = document?;
        stats.documents += 1;

        for resource in flatten(document) {
            stats.resources += 1;

            let view = ResourceRef::new(&resource);
            if selector.matches_ref(&view) == options.invert_match {
                tracing::trace!(
                    "Skipping {}/{}.{}",
                    view.kind(),
                    view.name(),
                    view.namespace()
                );
                continue;
            }

            write_resource(mode, &resource, &mut output, &format_options)?;
            stats.matched += 1;
        }
    }

    output.flush().map_err(FormatError::from)?;

    tracing::debug!(
        "Grep finished: {} documents, {} resources, {} matched",
        stats.documents,
        stats.resources,
        stats.matched
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str, selector: &Selector, options: GrepOptions) -> (String, GrepStats) {
        let mut out = Vec::new();
        let stats =
            grep_resources(selector, input.as_bytes(), &mut out, OutputMode::Summary, options)
                .unwrap();
        (String::from_utf8(out).unwrap(), stats)
    }

    const STREAM: &str = "\
kind: Namespace
metadata:
  name: apps
---
kind: List
items:
- kind: Deployment
  metadata:
    name: web
    namespace: apps
    labels:
      app: web
- kind: Service
  metadata:
    name: web
    namespace: apps
";

    #[test]
    fn test_stats() {
        let (out, stats) = run(STREAM, &Selector::default(), GrepOptions::default());
        assert_eq!(out, "Namespace/apps.\nDeployment/web.apps\nService/web.apps\n");
        assert_eq!(
            stats,
            GrepStats {
                documents: 2,
                resources: 3,
                matched: 3
            }
        );
    }

    #[test]
    fn test_invert_match() {
        let selector = Selector::builder().kind("Service").build().unwrap();
        let options = GrepOptions {
            invert_match: true,
            ..Default::default()
        };
        let (out, stats) = run(STREAM, &selector, options);
        assert_eq!(out, "Namespace/apps.\nDeployment/web.apps\n");
        assert_eq!(stats.matched, 2);
    }

    #[test]
    fn test_omit_kind() {
        let selector = Selector::builder().namespace("apps").build().unwrap();
        let options = GrepOptions {
            omit_kind: true,
            ..Default::default()
        };
        let (out, _) = run(STREAM, &selector, options);
        assert_eq!(out, "web.apps\nweb.apps\n");
    }

    #[test]
    fn test_broken_pipe_detection() {
        let err = GrepError::Format(FormatError::Io(std::io::Error::from(
            std::io::ErrorKind::BrokenPipe,
        )));
        assert!(err.is_broken_pipe());
    }
}
