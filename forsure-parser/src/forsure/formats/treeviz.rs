//! Treeviz formatter for structure trees
//!
//! Treeviz is a visual representation of the tree, one line per node, which makes it quick
//! to scan in a terminal. Nesting is drawn with box connectors, two columns per level.
//!
//! So the format is :
//! <prefix><connector> <icon> <name>[ {attrs}][ "description preview"]
//!
//! Example:
//!
//!   ⧉ root
//!   ├─ ▸ src { generated: false }
//!   │ └─ ◦ index.js "Entry point."
//!   └─ ◦ README.md
//!
//! Icons
//!     Root: ⧉
//!     Directory: ▸
//!     File: ◦

use super::RenderOptions;
use crate::forsure::ast::Node;
use crate::forsure::lexing::attributes::format_attribute_block;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn get_icon(node: &Node) -> &'static str {
    if node.is_directory() {
        "▸"
    } else {
        "◦"
    }
}

fn label(node: &Node, options: &RenderOptions) -> String {
    let mut label = node.name.clone();
    let attributes = format_attribute_block(&node.attributes);
    if !attributes.is_empty() {
        label.push(' ');
        label.push_str(&attributes);
    }
    if let Some(description) = &node.description {
        let first_line = description.lines().next().unwrap_or_default().trim();
        if options.description_preview > 0 && !first_line.is_empty() {
            label.push_str(&format!(
                " \"{}\"",
                truncate(first_line, options.description_preview)
            ));
        }
    }
    label
}

fn format_node(
    node: &Node,
    prefix: &str,
    is_last: bool,
    options: &RenderOptions,
    output: &mut String,
) {
    let connector = if is_last { "└─" } else { "├─" };
    output.push_str(&format!(
        "{}{} {} {}\n",
        prefix,
        connector,
        get_icon(node),
        label(node, options)
    ));

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    let children = node.children();
    for (i, child) in children.iter().enumerate() {
        format_node(child, &child_prefix, i == children.len() - 1, options, output);
    }
}

pub fn to_treeviz_str(node: &Node) -> String {
    to_treeviz_str_with(node, &RenderOptions::default())
}

pub fn to_treeviz_str_with(node: &Node, options: &RenderOptions) -> String {
    let mut output = format!("⧉ {}\n", label(node, options));
    let children = node.children();
    for (i, child) in children.iter().enumerate() {
        format_node(child, "", i == children.len() - 1, options, &mut output);
    }
    output
}
