//! # forsure
//!
//! A parser for ForSure project structure documents.
//!
//! File Layout
//!
//!     The pipeline is split the same way the data flows: raw text is scanned into classified
//!     lines, structural lines are parsed into declarations, and declarations are folded into a
//!     typed tree. Everything that consumes a tree (renderers, editing, diffing) lives next to it.
//!
//! src/forsure
//!   ├── ast         Node model and parse diagnostics
//!   ├── lexing      Line scanner and the attribute block tokenizer
//!   ├── parsing     Declaration grammar and the tree builder
//!   ├── formats     terse, treeviz, json and yaml output
//!   ├── editing     Pure tree transformations
//!   ├── diff        Structural comparison of two trees
//!   ├── defaults    Project skeletons for the lossy fallback
//!   ├── loader      Read a document from disk or a string and parse it
//!   └── testing     Fluent assertions used by the test suites
//!
//! For testing guidelines, see the [testing module](forsure::testing).

#![allow(rustdoc::invalid_html_tags)]

pub mod forsure;
