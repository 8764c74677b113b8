//! Structural diff between two trees
//!
//!     Children are matched by name, since names are unique among siblings. The walk is
//!     depth-first; inside a directory, removals and changes are reported in the old tree's
//!     order, followed by additions in the new tree's order. An added or removed directory is
//!     reported once, not once per descendant. Sibling reordering is not a change.

use crate::forsure::ast::Node;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    /// File became a directory or the other way round; children are not compared
    KindChanged,
    AttributesChanged,
    DescriptionChanged,
}

impl ChangeKind {
    fn marker(&self) -> char {
        match self {
            ChangeKind::Added => '+',
            ChangeKind::Removed => '-',
            ChangeKind::KindChanged => '!',
            ChangeKind::AttributesChanged | ChangeKind::DescriptionChanged => '~',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    /// `/`-separated path from the root; empty for the root itself
    pub path: String,
    pub kind: ChangeKind,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        let detail = match self.kind {
            ChangeKind::Added | ChangeKind::Removed => "",
            ChangeKind::KindChanged => " (kind)",
            ChangeKind::AttributesChanged => " (attributes)",
            ChangeKind::DescriptionChanged => " (description)",
        };
        write!(f, "{} {}{}", self.kind.marker(), path, detail)
    }
}

/// List the changes that turn `old` into `new`.
pub fn diff(old: &Node, new: &Node) -> Vec<Change> {
    let mut changes = Vec::new();
    diff_into("", old, new, &mut changes);
    changes
}

fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

fn diff_into(path: &str, old: &Node, new: &Node, changes: &mut Vec<Change>) {
    let mut record = |kind| {
        changes.push(Change {
            path: path.to_string(),
            kind,
        })
    };
    if old.is_directory() != new.is_directory() {
        record(ChangeKind::KindChanged);
        return;
    }
    if old.attributes != new.attributes {
        record(ChangeKind::AttributesChanged);
    }
    if old.description != new.description {
        record(ChangeKind::DescriptionChanged);
    }

    for old_child in old.children() {
        let child = child_path(path, &old_child.name);
        match new.child(&old_child.name) {
            Some(new_child) => diff_into(&child, old_child, new_child, changes),
            None => changes.push(Change {
                path: child,
                kind: ChangeKind::Removed,
            }),
        }
    }
    for new_child in new.children() {
        if old.child(&new_child.name).is_none() {
            changes.push(Change {
                path: child_path(path, &new_child.name),
                kind: ChangeKind::Added,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forsure::parsing::parse;

    fn change(path: &str, kind: ChangeKind) -> Change {
        Change {
            path: path.to_string(),
            kind,
        }
    }

    #[test]
    fn test_identical_trees() {
        let tree = parse("- src:\n  - a.rs\n").unwrap();
        assert!(diff(&tree, &tree).is_empty());
    }

    #[test]
    fn test_reordering_is_not_a_change() {
        let old = parse("- a\n- b\n").unwrap();
        let new = parse("- b\n- a\n").unwrap();
        assert!(diff(&old, &new).is_empty());
    }

    #[test]
    fn test_changes_in_tree_order() {
        let old = parse(
            "- src:\n  - a.rs\n  - b.rs { size: 1 }\n- docs:\n  - guide.md\n- build\n",
        )
        .unwrap();
        let new = parse(
            "- src:\n  - b.rs { size: 2 }\n  - c.rs\n- docs\n- build\n  <description>output</description>\n- LICENSE\n",
        )
        .unwrap();
        assert_eq!(
            diff(&old, &new),
            vec![
                change("src/a.rs", ChangeKind::Removed),
                change("src/b.rs", ChangeKind::AttributesChanged),
                change("src/c.rs", ChangeKind::Added),
                change("docs", ChangeKind::KindChanged),
                change("build", ChangeKind::DescriptionChanged),
                change("LICENSE", ChangeKind::Added),
            ]
        );
    }

    #[test]
    fn test_root_changes() {
        let old = parse("root:\n  - a\n").unwrap();
        let new = parse("root: { v: 1 }\n  - a\n").unwrap();
        let changes = diff(&old, &new);
        assert_eq!(changes, vec![change("", ChangeKind::AttributesChanged)]);
        assert_eq!(changes[0].to_string(), "~ / (attributes)");
    }

    #[test]
    fn test_display() {
        assert_eq!(change("src/a.rs", ChangeKind::Added).to_string(), "+ src/a.rs");
        assert_eq!(change("docs", ChangeKind::KindChanged).to_string(), "! docs (kind)");
    }
}
