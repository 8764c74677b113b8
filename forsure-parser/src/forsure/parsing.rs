//! Structure parser
//!
//!     Turns ForSure source text into a [Node] tree, or fails with the first error found,
//!     pinned to its 1-based line. The pipeline is:
//!         1. Scanning. See [scanner](crate::forsure::lexing::scanner). Lines are classified,
//!            descriptions collected and indentation measured, lazily.
//!         2. Declaration decoding. See [declaration](declaration). Each structural line is
//!            decoded into a header, a terse declaration, or a verbose type/field line.
//!         3. Tree building. See [builder](builder). An explicit stack maps levels to parents
//!            and enforces nesting, duplicate and dialect rules.
//!
//!     The parser is a pure function of the source and [ParseOptions]: no I/O, no shared
//!     state, safe to call from any number of threads at once.
//!
//! Lossy Fallback
//!
//!     [parse_or_default] exists for demo and bootstrap flows only. It swallows errors and
//!     empty documents and substitutes a default project skeleton, logging a warning each
//!     time. Never use it for user-authored files.

pub mod builder;
pub mod declaration;

use crate::forsure::ast::{Node, ParseError, ParseErrorKind};
use crate::forsure::defaults::{default_structure, ProjectType};
use crate::forsure::lexing::scanner::LineScanner;
use builder::TreeBuilder;
use tracing::{debug, warn};

pub const DEFAULT_INDENT_UNIT: usize = 2;
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Spaces per indentation level
    pub indent_unit: usize,
    /// Deepest allowed node, counting the root's children as depth 1
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            indent_unit: DEFAULT_INDENT_UNIT,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Parse with the default options.
pub fn parse(source: &str) -> Result<Node, ParseError> {
    parse_with(source, &ParseOptions::default())
}

pub fn parse_with(source: &str, options: &ParseOptions) -> Result<Node, ParseError> {
    if source.trim().is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::EmptyDocument,
            1,
            "document is empty",
        ));
    }
    debug!(
        "parsing {} bytes (indent unit {}, max depth {})",
        source.len(),
        options.indent_unit,
        options.max_depth
    );

    let mut builder = TreeBuilder::new(options);
    for line in LineScanner::new(source, options.indent_unit) {
        builder.push_line(line?)?;
    }
    let root = builder.finish()?;

    debug!(
        "parsed {} files and {} directories",
        root.file_count(),
        root.directory_count()
    );
    Ok(root)
}

/// Parse, falling back to the default skeleton for `project_type_hint` when the document
/// fails to parse or declares nothing. Lossy: errors are logged and discarded.
pub fn parse_or_default(source: &str, project_type_hint: Option<&str>) -> Node {
    let project_type = project_type_hint
        .map(ProjectType::from_hint)
        .unwrap_or_default();
    parse_or_default_with(source, &ParseOptions::default(), project_type)
}

/// [parse_or_default] with explicit options and an already resolved project type.
pub fn parse_or_default_with(
    source: &str,
    options: &ParseOptions,
    project_type: ProjectType,
) -> Node {
    match parse_with(source, options) {
        Ok(root) if !root.children().is_empty() => root,
        Ok(_) => {
            warn!("document declares no entries; using the {project_type} skeleton");
            default_structure(project_type)
        }
        Err(error) => {
            warn!("{error}; using the {project_type} skeleton");
            default_structure(project_type)
        }
    }
}
