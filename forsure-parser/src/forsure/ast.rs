//! Tree model for parsed ForSure documents
//!
//!     A parsed document is a single [Node] tree whose root is always a directory. Nodes are
//!     plain owned data: the parser builds them once and every transformation (editing,
//!     diffing, fallback skeletons) produces a new tree rather than mutating a shared one.
//!
//!     The file/directory split is a tagged variant ([NodeKind]) so a file carrying children
//!     cannot be represented.

pub mod error;
pub mod node;

pub use error::{format_source_context, ParseError, ParseErrorKind};
pub use node::{AttributeValue, Attributes, Node, NodeKind};
