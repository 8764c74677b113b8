//! Output formats for parsed trees
//!
//!     terse   - ForSure source in the terse dialect; parses back to the same tree
//!     treeviz - one line per node with connectors and icons, for terminals
//!     json    - the serde shape of [Node], as returned to HTTP callers
//!     yaml    - same shape as json

pub mod terse;
pub mod treeviz;

use crate::forsure::ast::Node;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

pub use terse::{render, render_with};
pub use treeviz::to_treeviz_str;

/// Knobs shared by the text renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Spaces per level in terse output
    pub indent_unit: usize,
    /// Characters of description shown by treeviz; 0 hides descriptions
    pub description_preview: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            indent_unit: 2,
            description_preview: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    UnknownFormat(String),
    Serialization(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::UnknownFormat(name) => write!(
                f,
                "unknown format '{}' (expected one of: {})",
                name,
                Format::names().join(", ")
            ),
            FormatError::Serialization(msg) => write!(f, "serialization failed: {}", msg),
        }
    }
}

impl std::error::Error for FormatError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Terse,
    Treeviz,
    Json,
    Yaml,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Terse, Format::Treeviz, Format::Json, Format::Yaml];

    pub fn name(&self) -> &'static str {
        match self {
            Format::Terse => "terse",
            Format::Treeviz => "treeviz",
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Format::ALL.iter().map(Format::name).collect()
    }

    pub fn serialize(&self, node: &Node, options: &RenderOptions) -> Result<String, FormatError> {
        match self {
            Format::Terse => Ok(render_with(node, options)),
            Format::Treeviz => Ok(treeviz::to_treeviz_str_with(node, options)),
            Format::Json => serde_json::to_string_pretty(node)
                .map(|mut json| {
                    json.push('\n');
                    json
                })
                .map_err(|err| FormatError::Serialization(err.to_string())),
            Format::Yaml => {
                serde_yaml::to_string(node).map_err(|err| FormatError::Serialization(err.to_string()))
            }
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FormatError::UnknownFormat(s.to_string()))
    }
}
