//! Fluent assertion API for parsed trees
//!
//!     Tests that walk a [Node] by hand tend to check a count or two and stop. This module lets
//!     a test state everything it cares about about a tree in one expression, and keeps the
//!     test independent of how [Node] stores its children.
//!
//!     Every failure message carries the path of the node that failed, e.g.
//!     `root/src[0]/index.js: expected a file, found a directory`.
//!
//! Usage Example
//!
//!     ```rust,ignore
//!     use forsure_parser::forsure::parsing::parse;
//!     use forsure_parser::forsure::testing::assert_tree;
//!
//!     let root = parse("- src:\n  - main.rs\n").unwrap();
//!     assert_tree(&root)
//!         .is_directory()
//!         .child_count(1)
//!         .child_named("src", |src| {
//!             src.is_directory().child(0, |main| {
//!                 main.name("main.rs").is_file();
//!             });
//!         });
//!     ```

use crate::forsure::ast::{AttributeValue, Node};

/// Create an assertion builder for a tree
pub fn assert_tree(node: &Node) -> NodeAssertion<'_> {
    NodeAssertion {
        node,
        context: node.name.clone(),
    }
}

pub struct NodeAssertion<'a> {
    node: &'a Node,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn name(self, expected: &str) -> Self {
        assert_eq!(
            self.node.name, expected,
            "{}: expected name to be '{}', but got '{}'",
            self.context, expected, self.node.name
        );
        self
    }

    pub fn is_file(self) -> Self {
        assert!(
            self.node.is_file(),
            "{}: expected a file, found a {}",
            self.context,
            self.node.kind_name()
        );
        self
    }

    pub fn is_directory(self) -> Self {
        assert!(
            self.node.is_directory(),
            "{}: expected a directory, found a {}",
            self.context,
            self.node.kind_name()
        );
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        let actual = self.node.children().len();
        assert_eq!(
            actual, expected,
            "{}: expected {} children, found {}",
            self.context, expected, actual
        );
        self
    }

    pub fn child<F, R>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> R,
    {
        let children = self.node.children();
        assert!(
            index < children.len(),
            "{}: child index {} out of bounds ({} has {} children)",
            self.context,
            index,
            self.node.name,
            children.len()
        );
        let child = &children[index];
        assertion(NodeAssertion {
            node: child,
            context: format!("{}[{}]/{}", self.context, index, child.name),
        });
        self
    }

    pub fn child_named<F, R>(self, name: &str, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> R,
    {
        let Some(child) = self.node.children().iter().find(|child| child.name == name) else {
            panic!("{}: no child named '{}'", self.context, name);
        };
        assertion(NodeAssertion {
            node: child,
            context: format!("{}/{}", self.context, name),
        });
        self
    }

    pub fn attribute(self, key: &str, expected: AttributeValue) -> Self {
        match self.node.attributes.get(key) {
            Some(actual) => assert_eq!(
                actual, &expected,
                "{}: attribute '{}' mismatch",
                self.context, key
            ),
            None => panic!(
                "{}: missing attribute '{}' (has {:?})",
                self.context,
                key,
                self.node.attributes.keys().collect::<Vec<_>>()
            ),
        }
        self
    }

    pub fn attribute_count(self, expected: usize) -> Self {
        assert_eq!(
            self.node.attributes.len(),
            expected,
            "{}: expected {} attributes, found {:?}",
            self.context,
            expected,
            self.node.attributes
        );
        self
    }

    pub fn description(self, expected: &str) -> Self {
        assert_eq!(
            self.node.description.as_deref(),
            Some(expected),
            "{}: description mismatch",
            self.context
        );
        self
    }

    pub fn no_description(self) -> Self {
        assert!(
            self.node.description.is_none(),
            "{}: expected no description, found {:?}",
            self.context,
            self.node.description
        );
        self
    }
}
