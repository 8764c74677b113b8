//! Error types for parsing

use serde::Serialize;
use std::fmt;

/// The category of a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ParseErrorKind {
    /// Input is empty or whitespace only
    EmptyDocument,
    /// Tabs in indentation, or indentation that is not a multiple of the unit
    InvalidIndentation,
    /// A level gap, nesting under a file, or a sibling of an explicit root
    InvalidNesting,
    /// Unbalanced description tags, or a description with nothing to attach to
    UnterminatedDescription,
    /// Two siblings share a name
    DuplicateSiblingName,
    /// Nesting deeper than the configured limit
    MaxDepthExceeded,
    /// Terse and verbose declarations under the same directory
    MixedDialect,
    /// A structural line that does not fit the declaration grammar
    MalformedDeclaration,
}

impl ParseErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::EmptyDocument => "EmptyDocument",
            ParseErrorKind::InvalidIndentation => "InvalidIndentation",
            ParseErrorKind::InvalidNesting => "InvalidNesting",
            ParseErrorKind::UnterminatedDescription => "UnterminatedDescription",
            ParseErrorKind::DuplicateSiblingName => "DuplicateSiblingName",
            ParseErrorKind::MaxDepthExceeded => "MaxDepthExceeded",
            ParseErrorKind::MixedDialect => "MixedDialect",
            ParseErrorKind::MalformedDeclaration => "MalformedDeclaration",
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parse failure pinned to a 1-based source line.
///
/// Serializes as `{"kind": ..., "line": ..., "message": ...}`, which is the error object
/// handed back to HTTP callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, line: usize, message: impl Into<String>) -> Self {
        ParseError {
            kind,
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Format source code context around an error line
///
/// Shows 2 lines before the error, the error line with >> marker, and 2 lines after.
/// `line` is 1-based, matching [ParseError::line].
pub fn format_source_context(source: &str, line: usize) -> String {
    let lines: Vec<&str> = source.split('\n').collect();
    let error_index = line.saturating_sub(1);

    let start = error_index.saturating_sub(2);
    let end = (error_index + 3).min(lines.len());

    let mut context = String::new();
    for index in start..end {
        let marker = if index == error_index { ">>" } else { "  " };
        context.push_str(&format!(
            "{} {:3} | {}\n",
            marker,
            index + 1,
            lines[index].trim_end_matches('\r')
        ));
    }
    context
}
