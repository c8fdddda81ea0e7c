//! YAML stream decoding
//!
//! Splits a byte stream into YAML documents and decodes each one into a
//! generic [`serde_yaml::Value`] tree. Documents are produced lazily: only the
//! document currently being decoded is held in memory.
//!
//! Document boundaries are found on `---` (start) and `...` (end) marker
//! lines. YAML forbids these markers at column 0 inside any scalar, so block
//! scalars (`|`, `|+`, `>`) carrying blank lines or `key: value`-looking text
//! are never split.

use serde_yaml::Value;
use std::io::BufRead;

/// Errors produced while decoding a YAML stream
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A document is not well-formed YAML
    #[error("invalid YAML in document {document} at {}", position(.line, .column))]
    Syntax {
        /// 1-based index of the document in the stream
        document: usize,
        /// 1-based line in the stream (the error position when known,
        /// otherwise the document's first line)
        line: usize,
        /// 1-based column of the error, when known
        column: Option<usize>,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

fn position(line: &usize, column: &Option<usize>) -> String {
    match column {
        Some(column) => format!("line {} column {}", line, column),
        None => format!("line {}", line),
    }
}

/// Document boundary markers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    /// `---`, possibly followed by inline content (`--- |`, `--- !tag`)
    Start { has_content: bool },
    /// `...`
    End,
}

fn marker(line: &str) -> Option<Marker> {
    let line = line.trim_end_matches(['\n', '\r']);
    if let Some(rest) = marker_rest(line, "---") {
        let rest = rest.trim();
        return Some(Marker::Start {
            has_content: !rest.is_empty() && !rest.starts_with('#'),
        });
    }
    marker_rest(line, "...").map(|_| Marker::End)
}

/// Text after `token` when `line` is a marker line made of `token`
fn marker_rest<'a>(line: &'a str, token: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(token)?;
    if rest.is_empty() || rest.starts_with([' ', '\t']) {
        Some(rest)
    } else {
        None
    }
}

/// Whether a line carries document content (not blank, comment or directive)
fn is_content(line: &str) -> bool {
    let trimmed = line.trim();
    !(trimmed.is_empty() || trimmed.starts_with('#') || line.starts_with('%'))
}

/// Byte order mark, allowed at the start of a stream
const BOM: char = '\u{feff}';

/// Lazy iterator over the documents of a YAML stream
///
/// Yields one [`Value`] per non-empty document. Documents holding only
/// comments, directives or an explicit `null` are skipped. The first error
/// ends the iteration.
pub struct YamlDocuments<R> {
    reader: R,
    buffer: String,
    /// Line number of the first buffered line
    start_line: usize,
    line_no: usize,
    has_content: bool,
    has_marker: bool,
    documents: usize,
    done: bool,
}

impl<R: BufRead> YamlDocuments<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::new(),
            start_line: 1,
            line_no: 0,
            has_content: false,
            has_marker: false,
            documents: 0,
            done: false,
        }
    }

    fn push_line(&mut self, line: &str) {
        if self.buffer.is_empty() {
            self.start_line = self.line_no;
        }
        self.buffer.push_str(line);
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.has_content = false;
        self.has_marker = false;
    }

    /// Decode the buffered document, if it has any content
    fn take_document(&mut self) -> Option<Result<Value, DecodeError>> {
        if !self.has_content {
            self.reset();
            return None;
        }

        self.documents += 1;
        // Merge keys (`<<: *anchor`) are resolved so merged identity fields
        // read like literal ones.
        let result = serde_yaml::from_str::<Value>(&self.buffer).and_then(|mut value| {
            value.apply_merge()?;
            Ok(value)
        });
        let start_line = self.start_line;
        self.reset();

        match result {
            Ok(Value::Null) => {
                tracing::debug!("Skipping null document {}", self.documents);
                None
            }
            Ok(value) => {
                tracing::debug!(
                    "Decoded document {} starting at line {}",
                    self.documents,
                    start_line
                );
                Some(Ok(value))
            }
            Err(source) => {
                self.done = true;
                let location = source.location();
                let line = location
                    .as_ref()
                    .map(|loc| start_line + loc.line().saturating_sub(1))
                    .unwrap_or(start_line);
                Some(Err(DecodeError::Syntax {
                    document: self.documents,
                    line,
                    column: location.map(|loc| loc.column()),
                    source,
                }))
            }
        }
    }
}

impl<R: BufRead> Iterator for YamlDocuments<R> {
    type Item = Result<Value, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        loop {
            if self.done {
                return None;
            }

            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    self.done = true;
                    return self.take_document();
                }
                Ok(_) => {
                    self.line_no += 1;
                    if self.line_no == 1 && line.starts_with(BOM) {
                        line.remove(0);
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(DecodeError::Io(e)));
                }
            }

            match marker(&line) {
                Some(Marker::Start { has_content }) => {
                    let pending = if self.has_content || self.has_marker {
                        self.take_document()
                    } else {
                        None
                    };
                    self.push_line(&line);
                    self.has_marker = true;
                    self.has_content = has_content;
                    if pending.is_some() {
                        return pending;
                    }
                }
                Some(Marker::End) => {
                    if let Some(result) = self.take_document() {
                        return Some(result);
                    }
                }
                None => {
                    if is_content(&line) {
                        self.has_content = true;
                    }
                    self.push_line(&line);
                }
            }
        }
    }
}
