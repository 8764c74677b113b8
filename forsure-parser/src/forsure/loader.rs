//! Document loading utilities
//!
//! This module provides `DocumentLoader`, which reads ForSure source from a file or a string
//! and parses it. The CLI and the integration tests both go through it.
//!
//! # Example
//!
//! ```rust,ignore
//! use forsure_parser::forsure::loader::DocumentLoader;
//! use forsure_parser::forsure::parsing::ParseOptions;
//!
//! // From file
//! let loader = DocumentLoader::from_path("project.forsure").unwrap();
//! let root = loader.parse(&ParseOptions::default()).unwrap();
//!
//! // From string
//! let root = DocumentLoader::from_string("- src:\n").parse(&ParseOptions::default()).unwrap();
//! ```

use crate::forsure::ast::{format_source_context, Node, ParseError};
use crate::forsure::defaults::ProjectType;
use crate::forsure::parsing::{parse_or_default_with, parse_with, ParseOptions};
use std::fs;
use std::path::Path;

/// Error that can occur when loading documents
#[derive(Debug, Clone)]
pub enum LoaderError {
    /// IO error when reading file
    IoError(String),
    /// The source did not parse
    ParseError(ParseError),
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderError::IoError(msg) => write!(f, "IO error: {}", msg),
            LoaderError::ParseError(err) => write!(f, "Parse error: {}", err),
        }
    }
}

impl std::error::Error for LoaderError {}

impl From<std::io::Error> for LoaderError {
    fn from(err: std::io::Error) -> Self {
        LoaderError::IoError(err.to_string())
    }
}

impl From<ParseError> for LoaderError {
    fn from(err: ParseError) -> Self {
        LoaderError::ParseError(err)
    }
}

/// Holds one document's source text.
pub struct DocumentLoader {
    source: String,
}

impl DocumentLoader {
    /// Load from a file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let source = fs::read_to_string(path)?;
        Ok(DocumentLoader { source })
    }

    /// Load from a string
    pub fn from_string<S: Into<String>>(source: S) -> Self {
        DocumentLoader {
            source: source.into(),
        }
    }

    pub fn parse(&self, options: &ParseOptions) -> Result<Node, LoaderError> {
        Ok(parse_with(&self.source, options)?)
    }

    /// Lossy: see [parse_or_default_with].
    pub fn parse_or_default(&self, options: &ParseOptions, project_type: ProjectType) -> Node {
        parse_or_default_with(&self.source, options, project_type)
    }

    /// Source lines around a parse error, for terminal output.
    pub fn context_for(&self, error: &ParseError) -> String {
        format_source_context(&self.source, error.line)
    }

    /// Get the raw source string
    pub fn source(&self) -> &str {
        &self.source
    }
}
