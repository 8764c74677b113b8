//! Line Classification
//!
//! Core classification logic for determining line types from the trimmed line text.
//! Description bodies are not classified here: whether a line belongs to a description
//! depends on the lines before it, which is the scanner's job.

use std::fmt;

pub const DESCRIPTION_OPEN: &str = "<description>";
pub const DESCRIPTION_CLOSE: &str = "</description>";

/// The classification of a physical line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    /// Empty or whitespace only
    Blank,
    /// Starts with `#`
    Comment,
    /// Exactly `<description>`
    DescriptionOpen,
    /// Exactly `</description>`
    DescriptionClose,
    /// `<description>text</description>` on a single line
    InlineDescription,
    /// Anything else: a declaration, or a malformed line the parser will reject
    Structural,
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineType::Blank => "BLANK_LINE",
            LineType::Comment => "COMMENT_LINE",
            LineType::DescriptionOpen => "DESCRIPTION_OPEN_LINE",
            LineType::DescriptionClose => "DESCRIPTION_CLOSE_LINE",
            LineType::InlineDescription => "INLINE_DESCRIPTION_LINE",
            LineType::Structural => "STRUCTURAL_LINE",
        };
        f.write_str(name)
    }
}

/// Determine the type of a line. `trimmed` must already be stripped of surrounding whitespace.
pub fn classify_line(trimmed: &str) -> LineType {
    if trimmed.is_empty() {
        return LineType::Blank;
    }
    if trimmed.starts_with('#') {
        return LineType::Comment;
    }
    if trimmed == DESCRIPTION_OPEN {
        return LineType::DescriptionOpen;
    }
    if trimmed == DESCRIPTION_CLOSE {
        return LineType::DescriptionClose;
    }
    if is_inline_description(trimmed) {
        return LineType::InlineDescription;
    }
    LineType::Structural
}

fn is_inline_description(trimmed: &str) -> bool {
    trimmed.len() >= DESCRIPTION_OPEN.len() + DESCRIPTION_CLOSE.len()
        && trimmed.starts_with(DESCRIPTION_OPEN)
        && trimmed.ends_with(DESCRIPTION_CLOSE)
}

/// Text between the tags of an inline description line.
pub fn inline_description_text(trimmed: &str) -> &str {
    trimmed
        .strip_prefix(DESCRIPTION_OPEN)
        .and_then(|rest| rest.strip_suffix(DESCRIPTION_CLOSE))
        .unwrap_or_default()
        .trim()
}
