//! Tree editing
//!
//!     Pure transformations over a [Node] tree: each operation takes the tree by reference
//!     and returns an edited copy, or an [EditError] explaining why the edit is impossible.
//!     The input is never touched, and every returned tree keeps the parser's invariants
//!     (directories only, unique sibling names, valid names), so it renders back to source.
//!
//!     Paths are `/`-separated and relative to the root; empty segments are ignored, so ``,
//!     `/` and `./`-free paths like `src/` all work. The empty path is the root itself.
//!
//! Commands
//!
//!     [EditCommand] understands short English commands, the way the dashboard chat accepts
//!     them:
//!
//!         add a file called config.js in src
//!         create a folder called utils
//!         remove the file src/old.js
//!         rename the folder lib to shared
//!         move the file src/a.js to lib

use crate::forsure::ast::Node;
use crate::forsure::parsing::declaration::validate_name;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    PathNotFound(String),
    NotADirectory(String),
    AlreadyExists(String),
    CannotModifyRoot,
    InvalidName(String),
    MoveIntoItself(String),
    UnrecognizedCommand(String),
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::PathNotFound(path) => write!(f, "no entry at '{}'", path),
            EditError::NotADirectory(path) => write!(f, "'{}' is not a directory", path),
            EditError::AlreadyExists(path) => write!(f, "'{}' already exists", path),
            EditError::CannotModifyRoot => write!(f, "the root cannot be moved, renamed or removed"),
            EditError::InvalidName(msg) => write!(f, "invalid name: {}", msg),
            EditError::MoveIntoItself(path) => {
                write!(f, "cannot move '{}' into itself", path)
            }
            EditError::UnrecognizedCommand(command) => write!(
                f,
                "could not understand '{}'; try 'add a file called config.js' or 'create a folder called utils'",
                command
            ),
        }
    }
}

impl std::error::Error for EditError {}

fn segments(path: &str) -> Vec<&str> {
    path.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect()
}

fn check_name(name: &str) -> Result<(), EditError> {
    validate_name(name).map_err(EditError::InvalidName)?;
    if name.trim() != name {
        return Err(EditError::InvalidName(format!(
            "name `{}` has surrounding whitespace",
            name
        )));
    }
    Ok(())
}

/// Walk to the directory at `path` and hand out its children.
fn directory_mut<'a>(
    root: &'a mut Node,
    path: &[&str],
    create_missing: bool,
) -> Result<&'a mut Vec<Node>, EditError> {
    let mut current = root;
    for (i, segment) in path.iter().enumerate() {
        let children = current
            .children_mut()
            .ok_or_else(|| EditError::NotADirectory(path[..i].join("/")))?;
        let index = match children.iter().position(|child| child.name == *segment) {
            Some(index) => index,
            None if create_missing => {
                check_name(segment)?;
                children.push(Node::directory(*segment, Vec::new()));
                children.len() - 1
            }
            None => return Err(EditError::PathNotFound(path[..=i].join("/"))),
        };
        current = &mut children[index];
    }
    current
        .children_mut()
        .ok_or_else(|| EditError::NotADirectory(path.join("/")))
}

fn joined(parent: &[&str], name: &str) -> String {
    let mut all = parent.to_vec();
    all.push(name);
    all.join("/")
}

/// Add `node` under the directory at `parent_path`.
pub fn add_node(
    root: &Node,
    parent_path: &str,
    node: Node,
    create_missing: bool,
) -> Result<Node, EditError> {
    check_name(&node.name)?;
    let parent = segments(parent_path);
    let mut tree = root.clone();
    let children = directory_mut(&mut tree, &parent, create_missing)?;
    if children.iter().any(|child| child.name == node.name) {
        return Err(EditError::AlreadyExists(joined(&parent, &node.name)));
    }
    children.push(node);
    Ok(tree)
}

/// Add an empty file, creating missing parent directories.
pub fn create_file(root: &Node, parent_path: &str, name: &str) -> Result<Node, EditError> {
    add_node(root, parent_path, Node::file(name), true)
}

/// Add an empty directory, creating missing parent directories.
pub fn create_directory(root: &Node, parent_path: &str, name: &str) -> Result<Node, EditError> {
    add_node(root, parent_path, Node::directory(name, Vec::new()), true)
}

fn split_last<'p>(path: &'p str) -> Result<(Vec<&'p str>, &'p str), EditError> {
    let mut parts = segments(path);
    match parts.pop() {
        Some(last) => Ok((parts, last)),
        None => Err(EditError::CannotModifyRoot),
    }
}

pub fn remove_node(root: &Node, path: &str) -> Result<Node, EditError> {
    let (parent, name) = split_last(path)?;
    let mut tree = root.clone();
    let children = directory_mut(&mut tree, &parent, false)?;
    let index = children
        .iter()
        .position(|child| child.name == name)
        .ok_or_else(|| EditError::PathNotFound(joined(&parent, name)))?;
    children.remove(index);
    Ok(tree)
}

pub fn rename_node(root: &Node, path: &str, new_name: &str) -> Result<Node, EditError> {
    let (parent, name) = split_last(path)?;
    check_name(new_name)?;
    let mut tree = root.clone();
    let children = directory_mut(&mut tree, &parent, false)?;
    let index = children
        .iter()
        .position(|child| child.name == name)
        .ok_or_else(|| EditError::PathNotFound(joined(&parent, name)))?;
    if name != new_name && children.iter().any(|child| child.name == new_name) {
        return Err(EditError::AlreadyExists(joined(&parent, new_name)));
    }
    children[index].name = new_name.to_string();
    Ok(tree)
}

/// Move the entry at `source_path` into the directory at `target_path`, creating missing
/// target directories.
pub fn move_node(root: &Node, source_path: &str, target_path: &str) -> Result<Node, EditError> {
    let source = segments(source_path);
    if source.is_empty() {
        return Err(EditError::CannotModifyRoot);
    }
    let target = segments(target_path);
    if target.starts_with(&source) {
        return Err(EditError::MoveIntoItself(source.join("/")));
    }
    let node = root
        .find(source_path)
        .cloned()
        .ok_or_else(|| EditError::PathNotFound(source.join("/")))?;
    let without = remove_node(root, source_path)?;
    add_node(&without, target_path, node, true)
}

/// A parsed edit command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    Add {
        is_directory: bool,
        name: String,
        parent: String,
    },
    Remove {
        path: String,
    },
    Rename {
        path: String,
        new_name: String,
    },
    Move {
        path: String,
        target: String,
    },
}

static ADD_COMMAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)^(?:add|create)\s+(?:(?:a|an|new)\s+)*(file|folder|directory)\s+(?:(?:called|named)\s+)?['"]?([^'"\s]+)['"]?(?:\s+(?:in|to|at|under)\s+['"]?([^'"\s]+)['"]?)?$"#,
    )
    .expect("valid add command regex")
});

static REMOVE_COMMAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^(?:remove|delete)\s+(?:the\s+)?(?:file|folder|directory)\s+['"]?([^'"\s]+)['"]?$"#)
        .expect("valid remove command regex")
});

static RENAME_COMMAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)^rename\s+(?:the\s+)?(?:file|folder|directory)\s+['"]?([^'"\s]+)['"]?\s+to\s+['"]?([^'"\s]+)['"]?$"#,
    )
    .expect("valid rename command regex")
});

static MOVE_COMMAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)^move\s+(?:the\s+)?(?:file|folder|directory)\s+['"]?([^'"\s]+)['"]?\s+to\s+['"]?([^'"\s]+)['"]?$"#,
    )
    .expect("valid move command regex")
});

impl FromStr for EditCommand {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let command = s.trim();
        if let Some(captures) = ADD_COMMAND.captures(command) {
            return Ok(EditCommand::Add {
                is_directory: !captures[1].eq_ignore_ascii_case("file"),
                name: captures[2].to_string(),
                parent: captures
                    .get(3)
                    .map(|parent| parent.as_str().to_string())
                    .unwrap_or_default(),
            });
        }
        if let Some(captures) = REMOVE_COMMAND.captures(command) {
            return Ok(EditCommand::Remove {
                path: captures[1].to_string(),
            });
        }
        if let Some(captures) = RENAME_COMMAND.captures(command) {
            return Ok(EditCommand::Rename {
                path: captures[1].to_string(),
                new_name: captures[2].to_string(),
            });
        }
        if let Some(captures) = MOVE_COMMAND.captures(command) {
            return Ok(EditCommand::Move {
                path: captures[1].to_string(),
                target: captures[2].to_string(),
            });
        }
        Err(EditError::UnrecognizedCommand(command.to_string()))
    }
}

impl EditCommand {
    pub fn parse(text: &str) -> Result<Self, EditError> {
        text.parse()
    }

    pub fn apply(&self, root: &Node) -> Result<Node, EditError> {
        debug!("applying edit: {self}");
        match self {
            EditCommand::Add {
                is_directory: true,
                name,
                parent,
            } => create_directory(root, parent, name),
            EditCommand::Add {
                is_directory: false,
                name,
                parent,
            } => create_file(root, parent, name),
            EditCommand::Remove { path } => remove_node(root, path),
            EditCommand::Rename { path, new_name } => rename_node(root, path, new_name),
            EditCommand::Move { path, target } => move_node(root, path, target),
        }
    }
}

impl fmt::Display for EditCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditCommand::Add {
                is_directory,
                name,
                parent,
            } => {
                let kind = if *is_directory { "directory" } else { "file" };
                let place = if parent.is_empty() {
                    "the root directory"
                } else {
                    parent.as_str()
                };
                write!(f, "add {} '{}' to {}", kind, name, place)
            }
            EditCommand::Remove { path } => write!(f, "remove '{}'", path),
            EditCommand::Rename { path, new_name } => {
                write!(f, "rename '{}' to '{}'", path, new_name)
            }
            EditCommand::Move { path, target } => write!(f, "move '{}' to '{}'", path, target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forsure::testing::assert_tree;

    fn sample() -> Node {
        Node::directory(
            "root",
            vec![
                Node::directory("src", vec![Node::file("index.js"), Node::file("util.js")]),
                Node::file("README.md"),
            ],
        )
    }

    #[test]
    fn test_create_file_with_missing_parents() {
        let original = sample();
        let edited = create_file(&original, "src/lib/deep", "a.js").unwrap();
        assert!(edited.find("src/lib/deep/a.js").unwrap().is_file());
        assert!(edited.find("src/lib").unwrap().is_directory());
        assert_eq!(original, sample());
    }

    #[test]
    fn test_add_node_without_creating_parents() {
        let error = add_node(&sample(), "missing", Node::file("a"), false).unwrap_err();
        assert_eq!(error, EditError::PathNotFound("missing".to_string()));
    }

    #[test]
    fn test_add_existing_name() {
        let error = create_directory(&sample(), "/", "src").unwrap_err();
        assert_eq!(error, EditError::AlreadyExists("src".to_string()));
    }

    #[test]
    fn test_add_under_file() {
        let error = create_file(&sample(), "README.md", "x").unwrap_err();
        assert_eq!(error, EditError::NotADirectory("README.md".to_string()));
        let error = create_file(&sample(), "README.md/deeper", "x").unwrap_err();
        assert_eq!(error, EditError::NotADirectory("README.md".to_string()));
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "a/b", "..", "x: y", "dir:", " pad"] {
            let result = create_file(&sample(), "", name);
            assert!(
                matches!(result, Err(EditError::InvalidName(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_remove() {
        let edited = remove_node(&sample(), "src/util.js").unwrap();
        assert_tree(&edited).child(0, |src| {
            src.child_count(1);
        });
        assert_eq!(remove_node(&sample(), ""), Err(EditError::CannotModifyRoot));
        assert_eq!(
            remove_node(&sample(), "src/nope.js"),
            Err(EditError::PathNotFound("src/nope.js".to_string()))
        );
    }

    #[test]
    fn test_rename() {
        let edited = rename_node(&sample(), "src", "lib").unwrap();
        assert!(edited.find("lib/index.js").is_some());
        assert_eq!(
            rename_node(&sample(), "src/index.js", "util.js"),
            Err(EditError::AlreadyExists("src/util.js".to_string()))
        );
        assert_eq!(rename_node(&sample(), "src", "src").unwrap(), sample());
    }

    #[test]
    fn test_move() {
        let edited = move_node(&sample(), "src/util.js", "lib/shared").unwrap();
        assert!(edited.find("src/util.js").is_none());
        assert!(edited.find("lib/shared/util.js").is_some());
        assert_eq!(
            move_node(&sample(), "src", "src/inner"),
            Err(EditError::MoveIntoItself("src".to_string()))
        );
        assert_eq!(
            move_node(&sample(), "README.md", "src"),
            Ok(Node::directory(
                "root",
                vec![Node::directory(
                    "src",
                    vec![
                        Node::file("index.js"),
                        Node::file("util.js"),
                        Node::file("README.md")
                    ]
                )]
            ))
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            EditCommand::parse("add a file called config.js in src").unwrap(),
            EditCommand::Add {
                is_directory: false,
                name: "config.js".to_string(),
                parent: "src".to_string()
            }
        );
        assert_eq!(
            EditCommand::parse("Create a new folder named \"Utils\"").unwrap(),
            EditCommand::Add {
                is_directory: true,
                name: "Utils".to_string(),
                parent: String::new()
            }
        );
        assert_eq!(
            EditCommand::parse("delete the file src/old.js").unwrap(),
            EditCommand::Remove {
                path: "src/old.js".to_string()
            }
        );
        assert_eq!(
            EditCommand::parse("rename the folder lib to shared").unwrap(),
            EditCommand::Rename {
                path: "lib".to_string(),
                new_name: "shared".to_string()
            }
        );
        assert_eq!(
            EditCommand::parse("move the file src/a.js to lib").unwrap(),
            EditCommand::Move {
                path: "src/a.js".to_string(),
                target: "lib".to_string()
            }
        );
        assert!(matches!(
            EditCommand::parse("make it better"),
            Err(EditError::UnrecognizedCommand(_))
        ));
    }

    #[test]
    fn test_apply_command() {
        let command = EditCommand::parse("create a folder called docs").unwrap();
        assert_eq!(command.to_string(), "add directory 'docs' to the root directory");
        let edited = command.apply(&sample()).unwrap();
        assert!(edited.find("docs").unwrap().is_directory());
    }
}
