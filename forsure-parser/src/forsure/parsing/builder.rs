//! Tree builder
//!
//!     Turns the scanned line stream into a [Node] tree with an explicit stack of open
//!     ancestors. No recursion is involved, so deeply nested input costs heap, not call stack.
//!
//!     Every declared node is pushed as a frame, files included: a file frame is simply closed
//!     by the next declaration at its depth or shallower. Closing a frame moves its node into
//!     the parent's children, which is why sibling lookups only ever look at the parent node.
//!
//! Depth
//!
//!     With a `root:` header the header is depth 0 and a line's depth is its level. Without a
//!     header the root is implicit and a line's depth is its level + 1. In both cases the
//!     root frame sits at depth 0 and a declaration at depth d must land directly under the
//!     open frame at depth d - 1.
//!
//! Verbose entries
//!
//!     A `- Type:` line pushes a frame whose name is still unknown. Field lines at the entry's
//!     depth or one deeper fill it in until the entry gets its first child. An entry still
//!     unnamed when it closes is malformed, except for the root meta entry: the first
//!     declaration under an explicit header, a directory at depth 1, which describes the root
//!     itself.
//!
//! Descriptions
//!
//!     A block belongs to the entry it is indented under: a tag at depth d attaches to the
//!     open frame at depth d - 1. Without a header the implicit root takes no description.

use super::declaration::{parse_declaration, parse_field, Declaration, Field};
use super::ParseOptions;
use crate::forsure::ast::{AttributeValue, Attributes, Node, NodeKind, ParseError, ParseErrorKind};
use crate::forsure::lexing::scanner::ScannedLine;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Terse,
    Verbose,
}

impl Dialect {
    fn as_str(&self) -> &'static str {
        match self {
            Dialect::Terse => "terse",
            Dialect::Verbose => "verbose",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct VerboseState {
    named: bool,
    accepting_fields: bool,
    root_meta_candidate: bool,
}

#[derive(Debug)]
struct Frame {
    node: Node,
    depth: usize,
    line: usize,
    child_dialect: Option<Dialect>,
    verbose: Option<VerboseState>,
}

impl Frame {
    fn new(node: Node, depth: usize, line: usize, verbose: Option<VerboseState>) -> Self {
        Frame {
            node,
            depth,
            line,
            child_dialect: None,
            verbose,
        }
    }
}

pub struct TreeBuilder {
    stack: Vec<Frame>,
    has_header: bool,
    seen_structural: bool,
    declared: usize,
    max_depth: usize,
}

impl TreeBuilder {
    pub fn new(options: &ParseOptions) -> Self {
        TreeBuilder {
            stack: vec![Frame::new(Node::directory("root", Vec::new()), 0, 0, None)],
            has_header: false,
            seen_structural: false,
            declared: 0,
            max_depth: options.max_depth,
        }
    }

    pub fn push_line(&mut self, line: ScannedLine<'_>) -> Result<(), ParseError> {
        match line {
            ScannedLine::Structural {
                number,
                level,
                content,
            } => self.structural(number, level, content),
            ScannedLine::Description {
                number,
                level,
                text,
            } => self.describe(number, level, text),
        }
    }

    /// Close every open frame and hand back the root.
    pub fn finish(mut self) -> Result<Node, ParseError> {
        while self.stack.len() > 1 {
            self.close_top()?;
        }
        match self.stack.pop() {
            Some(frame) => Ok(frame.node),
            None => Err(ParseError::new(
                ParseErrorKind::EmptyDocument,
                1,
                "document has no root",
            )),
        }
    }

    fn structural(&mut self, number: usize, level: usize, content: &str) -> Result<(), ParseError> {
        let first = !self.seen_structural;
        self.seen_structural = true;
        let declaration = parse_declaration(content).map_err(|message| malformed(number, message))?;
        trace!("line {number}: level {level} {declaration:?}");

        match declaration {
            Declaration::Header { attributes } => {
                if !first || level != 0 {
                    return Err(malformed(
                        number,
                        "`root:` header is only allowed as the first, unindented line",
                    ));
                }
                self.has_header = true;
                self.stack[0].node.attributes = attributes;
                Ok(())
            }
            Declaration::Terse {
                name,
                is_directory,
                attributes,
            } => {
                let depth = self.depth_for(number, level)?;
                self.open_parent(number, depth)?;
                self.claim_name(number, &name, Dialect::Terse)?;
                let mut node = if is_directory {
                    Node::directory(name, Vec::new())
                } else {
                    Node::file(name)
                };
                node.attributes = attributes;
                self.push_frame(Frame::new(node, depth, number, None));
                Ok(())
            }
            Declaration::VerboseType { is_directory } => {
                let depth = self.depth_for(number, level)?;
                self.open_parent(number, depth)?;
                let node = if is_directory {
                    Node::directory(String::new(), Vec::new())
                } else {
                    Node::file(String::new())
                };
                let state = VerboseState {
                    named: false,
                    accepting_fields: true,
                    root_meta_candidate: self.has_header
                        && depth == 1
                        && is_directory
                        && self.declared == 0,
                };
                self.push_frame(Frame::new(node, depth, number, Some(state)));
                Ok(())
            }
            Declaration::VerboseField { key, value } => self.field(number, level, key, value),
        }
    }

    fn depth_for(&self, number: usize, level: usize) -> Result<usize, ParseError> {
        let depth = if self.has_header {
            if level == 0 {
                return Err(ParseError::new(
                    ParseErrorKind::InvalidNesting,
                    number,
                    "entries under `root:` must be indented one level",
                ));
            }
            level
        } else {
            level + 1
        };
        if depth > self.max_depth {
            return Err(ParseError::new(
                ParseErrorKind::MaxDepthExceeded,
                number,
                format!("nesting depth {} exceeds the limit of {}", depth, self.max_depth),
            ));
        }
        Ok(depth)
    }

    /// Pop back to the frame that will own a declaration at `depth` and check it can.
    fn open_parent(&mut self, number: usize, depth: usize) -> Result<(), ParseError> {
        while self.top().depth >= depth {
            self.close_top()?;
        }
        let parent = self.top();
        if depth > parent.depth + 1 {
            return Err(ParseError::new(
                ParseErrorKind::InvalidNesting,
                number,
                format!(
                    "indentation jumps {} levels past `{}`",
                    depth - parent.depth,
                    display_name(&parent.node)
                ),
            ));
        }
        if parent.node.is_file() {
            return Err(ParseError::new(
                ParseErrorKind::InvalidNesting,
                number,
                format!(
                    "`{}` is a file and cannot contain entries",
                    display_name(&parent.node)
                ),
            ));
        }
        if let Some(state) = parent.verbose {
            if !state.named {
                return Err(malformed(
                    parent.line,
                    "verbose entry needs a `Name:` field before its children",
                ));
            }
        }
        Ok(())
    }

    fn push_frame(&mut self, frame: Frame) {
        if let Some(state) = self.top_mut().verbose.as_mut() {
            state.accepting_fields = false;
        }
        self.declared += 1;
        self.stack.push(frame);
    }

    /// Check a new name against the siblings already closed under the parent frame.
    ///
    /// The parent is the top of the stack for terse lines and the frame under the entry for
    /// verbose `Name:` lines.
    fn claim_name(&mut self, number: usize, name: &str, dialect: Dialect) -> Result<(), ParseError> {
        let parent_index = match dialect {
            Dialect::Terse => self.stack.len() - 1,
            Dialect::Verbose => self.stack.len() - 2,
        };
        let parent = &mut self.stack[parent_index];
        if let Some(existing) = parent.child_dialect.filter(|existing| *existing != dialect) {
            return Err(ParseError::new(
                ParseErrorKind::MixedDialect,
                number,
                format!(
                    "{} entry `{}` among {} siblings under `{}`",
                    dialect.as_str(),
                    name,
                    existing.as_str(),
                    display_name(&parent.node)
                ),
            ));
        }
        parent.child_dialect = Some(dialect);
        if parent.node.child(name).is_some() {
            return Err(ParseError::new(
                ParseErrorKind::DuplicateSiblingName,
                number,
                format!(
                    "`{}` already exists in `{}`",
                    name,
                    display_name(&parent.node)
                ),
            ));
        }
        Ok(())
    }

    fn field(&mut self, number: usize, level: usize, key: &str, value: &str) -> Result<(), ParseError> {
        let depth = if self.has_header { level } else { level + 1 };
        let top = self.top();
        let accepts = match top.verbose {
            Some(state) => state.accepting_fields && (depth == top.depth || depth == top.depth + 1),
            None => false,
        };
        if !accepts {
            return Err(malformed(
                number,
                format!("field `{}: {}` is not part of a verbose entry", key, value),
            ));
        }

        match parse_field(key, value).map_err(|message| malformed(number, message))? {
            Field::Name(name) => {
                if self.top().verbose.is_some_and(|state| state.named) {
                    return Err(malformed(number, "verbose entry has more than one `Name:`"));
                }
                self.claim_name(number, &name, Dialect::Verbose)?;
                let top = self.top_mut();
                top.node.name = name;
                if let Some(state) = top.verbose.as_mut() {
                    state.named = true;
                }
            }
            Field::Attribute(key, value) => {
                insert_attribute(&mut self.top_mut().node.attributes, key, value)
                    .map_err(|message| malformed(number, message))?;
            }
        }
        Ok(())
    }

    /// Attach a description block to the entry it is indented under.
    ///
    /// A block one level deeper than an open entry belongs to that entry, closing any deeper
    /// frames on the way. A verbose entry still taking fields also owns a block at its own
    /// level, the same way it owns fields there.
    fn describe(&mut self, number: usize, level: usize, text: String) -> Result<(), ParseError> {
        let depth = if self.has_header { level } else { level + 1 };
        let top = self.top();
        let own_level = top
            .verbose
            .is_some_and(|state| state.accepting_fields && top.depth == depth);

        if !own_level {
            if depth == 0 {
                return Err(ParseError::new(
                    ParseErrorKind::InvalidNesting,
                    number,
                    "description must be indented under the entry it describes",
                ));
            }
            let target = depth - 1;
            if target == 0 && !self.has_header {
                return Err(ParseError::new(
                    ParseErrorKind::UnterminatedDescription,
                    number,
                    "description block has no entry to attach to",
                ));
            }
            if target > self.top().depth {
                return Err(ParseError::new(
                    ParseErrorKind::InvalidNesting,
                    number,
                    format!(
                        "description is indented past `{}`",
                        display_name(&self.top().node)
                    ),
                ));
            }
            while self.top().depth > target {
                self.close_top()?;
            }
        }

        let node = &mut self.top_mut().node;
        if node.description.is_some() {
            return Err(malformed(
                number,
                format!("`{}` already has a description", display_name(node)),
            ));
        }
        node.description = Some(text);
        Ok(())
    }

    fn close_top(&mut self) -> Result<(), ParseError> {
        let Some(frame) = self.stack.pop() else {
            return Ok(());
        };
        let unnamed = frame.verbose.filter(|state| !state.named);
        match unnamed {
            Some(state) if state.root_meta_candidate => self.merge_into_root(frame),
            Some(_) => Err(malformed(frame.line, "verbose entry has no `Name:` field")),
            None => {
                if let NodeKind::Directory { children } = &mut self.top_mut().node.kind {
                    children.push(frame.node);
                }
                Ok(())
            }
        }
    }

    /// Fold the root meta entry into the root node.
    fn merge_into_root(&mut self, frame: Frame) -> Result<(), ParseError> {
        let root = &mut self.stack[0].node;
        for (key, value) in frame.node.attributes {
            insert_attribute(&mut root.attributes, key, value)
                .map_err(|message| malformed(frame.line, message))?;
        }
        if let Some(description) = frame.node.description {
            if root.description.is_some() {
                return Err(malformed(frame.line, "root already has a description"));
            }
            root.description = Some(description);
        }
        Ok(())
    }

    fn top(&self) -> &Frame {
        &self.stack[self.stack.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Frame {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }
}

fn insert_attribute(
    attributes: &mut Attributes,
    key: String,
    value: AttributeValue,
) -> Result<(), String> {
    if attributes.contains_key(&key) {
        return Err(format!("duplicate attribute key `{}`", key));
    }
    attributes.insert(key, value);
    Ok(())
}

fn display_name(node: &Node) -> &str {
    if node.name.is_empty() {
        "(unnamed entry)"
    } else {
        &node.name
    }
}

fn malformed(line: usize, message: impl Into<String>) -> ParseError {
    ParseError::new(ParseErrorKind::MalformedDeclaration, line, message)
}
