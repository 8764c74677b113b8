//! Node and attribute types

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Attribute map attached to a node. Ordered so output is deterministic.
pub type Attributes = BTreeMap<String, AttributeValue>;

static NUMERIC_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?$").expect("valid numeric regex")
});

/// A scalar attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl AttributeValue {
    /// Coerce raw attribute text into a typed value.
    ///
    /// Exactly `true`/`false` become booleans, numeric literals become numbers (integers when
    /// they have no fraction or exponent and fit in an i64), everything else stays text.
    pub fn coerce(raw: &str) -> Self {
        match raw {
            "true" => return AttributeValue::Bool(true),
            "false" => return AttributeValue::Bool(false),
            _ => {}
        }
        if is_numeric_literal(raw) {
            let integral = !raw.contains(['.', 'e', 'E']);
            if integral {
                if let Ok(value) = raw.parse::<i64>() {
                    return AttributeValue::Integer(value);
                }
            }
            if let Ok(value) = raw.parse::<f64>() {
                return AttributeValue::Float(value);
            }
        }
        AttributeValue::Text(raw.to_string())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Bool(_) => "bool",
            AttributeValue::Integer(_) => "integer",
            AttributeValue::Float(_) => "float",
            AttributeValue::Text(_) => "text",
        }
    }
}

/// Check whether raw text would coerce to a number.
pub fn is_numeric_literal(raw: &str) -> bool {
    NUMERIC_LITERAL.is_match(raw)
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(value) => write!(f, "{}", value),
            AttributeValue::Integer(value) => write!(f, "{}", value),
            // Debug keeps the fraction/exponent so the text coerces back to a float
            AttributeValue::Float(value) => write!(f, "{:?}", value),
            AttributeValue::Text(value) => write!(f, "{}", value),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Integer(i64::from(value))
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

/// File or directory discriminator. Only directories carry children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory { children: Vec<Node> },
}

/// A single file or directory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Node {
    pub fn file(name: impl Into<String>) -> Self {
        Node {
            name: name.into(),
            kind: NodeKind::File,
            attributes: Attributes::new(),
            description: None,
        }
    }

    pub fn directory(name: impl Into<String>, children: Vec<Node>) -> Self {
        Node {
            name: name.into(),
            kind: NodeKind::Directory { children },
            attributes: Attributes::new(),
            description: None,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a child. Has no effect on files.
    pub fn with_child(mut self, child: Node) -> Self {
        if let NodeKind::Directory { children } = &mut self.kind {
            children.push(child);
        }
        self
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File)
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            NodeKind::File => "file",
            NodeKind::Directory { .. } => "directory",
        }
    }

    /// Children in source order. Files have none.
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::File => &[],
            NodeKind::Directory { children } => children,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match &mut self.kind {
            NodeKind::File => None,
            NodeKind::Directory { children } => Some(children),
        }
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children().iter().find(|child| child.name == name)
    }

    /// Look up a descendant by a `/`-separated path relative to this node.
    ///
    /// Empty segments are ignored, so `""` and `"/"` resolve to the node itself.
    pub fn find(&self, path: &str) -> Option<&Node> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |current, segment| current.child(segment))
    }

    /// Depth-first, pre-order traversal paired with each node's depth (this node is depth 0).
    pub fn walk(&self) -> Vec<(usize, &Node)> {
        let mut visited = Vec::new();
        let mut pending = vec![(0usize, self)];
        while let Some((depth, node)) = pending.pop() {
            visited.push((depth, node));
            for child in node.children().iter().rev() {
                pending.push((depth + 1, child));
            }
        }
        visited
    }

    /// Number of files below this node.
    pub fn file_count(&self) -> usize {
        self.walk().iter().filter(|(_, node)| node.is_file()).count()
    }

    /// Number of directories below this node, not counting the node itself.
    pub fn directory_count(&self) -> usize {
        self.walk()
            .iter()
            .skip(1)
            .filter(|(_, node)| node.is_directory())
            .count()
    }

    /// Depth of the deepest descendant (0 for a node without children).
    pub fn max_depth(&self) -> usize {
        self.walk()
            .iter()
            .map(|(depth, _)| *depth)
            .max()
            .unwrap_or(0)
    }
}
