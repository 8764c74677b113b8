//! Lexer
//!
//!     ForSure is a line oriented format, so lexing happens one physical line at a time. Each
//!     line is classified (blank, comment, description tag, structural) and only structural
//!     lines reach the parser, already stripped of their indentation and annotated with their
//!     nesting level.
//!
//! The Lexing Pipeline
//!
//!     The pipeline consists of:
//!         1. Line classification. See [line_classification](line_classification).
//!            A stateless, precedence ordered look at the trimmed line.
//!
//!         2. Scanning. See [scanner](scanner).
//!            The stateful part: description blocks swallow every line up to their closing
//!            tag, and structural lines get their indentation measured against the unit.
//!
//!         3. Attribute blocks. See [attributes](attributes).
//!            The `{ key: value }` tail of a declaration is tokenized with logos on demand by
//!            the parser, since only declaration lines can carry one.
//!
//! Indentation Handling
//!
//!     Indentation is spaces only. A tab anywhere in the leading whitespace of a structural
//!     line is rejected, as is any width that is not an exact multiple of the unit. Blank,
//!     comment and description lines are never measured.
//!
//!     The scanner is a lazy iterator. Errors surface in source order, interleaved with the
//!     parser's own checks, so the first problem in the file is always the one reported.

pub mod attributes;
pub mod line_classification;
pub mod scanner;

pub use attributes::{format_attribute_block, format_attribute_value, parse_attribute_block};
pub use line_classification::{classify_line, LineType};
pub use scanner::{LineScanner, ScannedLine};
