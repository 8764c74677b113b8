//! Terse renderer
//!
//!     Serializes a tree back into ForSure source, always in the terse dialect and always
//!     with an explicit `root:` header (carrying the root's attributes). A node at depth d
//!     is written d levels deep; its description follows as a block one level deeper:
//!
//!         root: { version: 2 }
//!           - src: { generated: false }
//!             <description>
//!             Source code.
//!             </description>
//!             - main.rs
//!
//!     Output is deterministic (attributes come out in key order) and parses back to an
//!     equal tree with the same indentation unit. The root's own name is not written: a
//!     parsed root is always called `root`. Descriptions are written verbatim, so a body
//!     line that is itself `</description>` cannot be represented.

use super::RenderOptions;
use crate::forsure::ast::Node;
use crate::forsure::lexing::attributes::format_attribute_block;
use crate::forsure::lexing::line_classification::{DESCRIPTION_CLOSE, DESCRIPTION_OPEN};
use crate::forsure::parsing::declaration::ROOT_HEADER;

/// Render with the default two-space indentation.
pub fn render(node: &Node) -> String {
    render_with(node, &RenderOptions::default())
}

pub fn render_with(node: &Node, options: &RenderOptions) -> String {
    let unit = options.indent_unit.max(1);
    let mut output = String::new();

    for (depth, current) in node.walk() {
        if depth == 0 {
            output.push_str(ROOT_HEADER);
        } else {
            output.push_str(&" ".repeat(depth * unit));
            output.push_str("- ");
            output.push_str(&current.name);
            if current.is_directory() {
                output.push(':');
            }
        }
        let attributes = format_attribute_block(&current.attributes);
        if !attributes.is_empty() {
            output.push(' ');
            output.push_str(&attributes);
        }
        output.push('\n');

        if let Some(description) = &current.description {
            push_description(&mut output, description, (depth + 1) * unit);
        }
    }
    output
}

fn push_description(output: &mut String, description: &str, width: usize) {
    let indent = " ".repeat(width);
    output.push_str(&indent);
    output.push_str(DESCRIPTION_OPEN);
    output.push('\n');
    if !description.is_empty() {
        for line in description.split('\n') {
            if !line.is_empty() {
                output.push_str(&indent);
                output.push_str(line);
            }
            output.push('\n');
        }
    }
    output.push_str(&indent);
    output.push_str(DESCRIPTION_CLOSE);
    output.push('\n');
}
