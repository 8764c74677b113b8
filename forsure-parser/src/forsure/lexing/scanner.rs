//! Line scanner
//!
//!     Walks the source one physical line at a time and yields only what the parser cares
//!     about: structural lines (with their indentation level) and complete description blocks.
//!     Blank and comment lines are dropped here.
//!
//!     Description blocks are collected verbatim. Every body line loses up to as many leading
//!     spaces as the opening tag was indented, so a block written one level under its node
//!     reads back without that indentation. Blank and `#` lines inside a block are body text.
//!     The opening tag is indented like a structural line and its level is passed on, so the
//!     parser can find the entry the block sits under.

use crate::forsure::ast::{ParseError, ParseErrorKind};
use crate::forsure::lexing::line_classification::{
    classify_line, inline_description_text, LineType, DESCRIPTION_CLOSE,
};
use std::iter::Enumerate;
use std::str::Split;
use tracing::trace;

/// A line the parser has to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannedLine<'a> {
    /// A declaration line, trimmed, with its indentation expressed in units
    Structural {
        number: usize,
        level: usize,
        content: &'a str,
    },
    /// A whole description block; `number` and `level` are those of the opening tag
    Description {
        number: usize,
        level: usize,
        text: String,
    },
}

impl ScannedLine<'_> {
    pub fn number(&self) -> usize {
        match self {
            ScannedLine::Structural { number, .. } | ScannedLine::Description { number, .. } => {
                *number
            }
        }
    }
}

/// Lazy scanner over the lines of a source string.
pub struct LineScanner<'a> {
    lines: Enumerate<Split<'a, char>>,
    indent_unit: usize,
    finished: bool,
}

impl<'a> LineScanner<'a> {
    pub fn new(source: &'a str, indent_unit: usize) -> Self {
        LineScanner {
            lines: source.split('\n').enumerate(),
            indent_unit: indent_unit.max(1),
            finished: false,
        }
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        self.lines
            .next()
            .map(|(index, raw)| (index + 1, raw.strip_suffix('\r').unwrap_or(raw)))
    }

    fn collect_description(
        &mut self,
        open_number: usize,
        open_line: &str,
    ) -> Result<ScannedLine<'a>, ParseError> {
        let level = measure_level(open_line, open_number, self.indent_unit)?;
        let open_indent = leading_spaces(open_line);
        let mut body: Vec<&str> = Vec::new();
        while let Some((_, line)) = self.next_line() {
            if line.trim() == DESCRIPTION_CLOSE {
                return Ok(ScannedLine::Description {
                    number: open_number,
                    level,
                    text: body.join("\n"),
                });
            }
            body.push(strip_indent(line, open_indent));
        }
        Err(ParseError::new(
            ParseErrorKind::UnterminatedDescription,
            open_number,
            "`<description>` is never closed with `</description>`",
        ))
    }

    fn scan(&mut self) -> Option<Result<ScannedLine<'a>, ParseError>> {
        loop {
            let (number, line) = self.next_line()?;
            let trimmed = line.trim();
            let line_type = classify_line(trimmed);
            trace!("line {number}: {line_type}");
            let scanned = match line_type {
                LineType::Blank | LineType::Comment => continue,
                LineType::DescriptionClose => Err(ParseError::new(
                    ParseErrorKind::UnterminatedDescription,
                    number,
                    "`</description>` without a matching `<description>`",
                )),
                LineType::InlineDescription => {
                    measure_level(line, number, self.indent_unit).map(|level| {
                        ScannedLine::Description {
                            number,
                            level,
                            text: inline_description_text(trimmed).to_string(),
                        }
                    })
                }
                LineType::DescriptionOpen => self.collect_description(number, line),
                LineType::Structural => measure_level(line, number, self.indent_unit).map(
                    |level| ScannedLine::Structural {
                        number,
                        level,
                        content: trimmed,
                    },
                ),
            };
            return Some(scanned);
        }
    }
}

impl<'a> Iterator for LineScanner<'a> {
    type Item = Result<ScannedLine<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let item = self.scan();
        if !matches!(item, Some(Ok(_))) {
            self.finished = true;
        }
        item
    }
}

fn leading_spaces(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ').count()
}

/// Remove up to `width` leading spaces.
fn strip_indent(line: &str, width: usize) -> &str {
    let strip = leading_spaces(line).min(width);
    &line[strip..]
}

/// Convert the leading whitespace of a structural line or description tag into an
/// indentation level.
pub fn measure_level(line: &str, number: usize, indent_unit: usize) -> Result<usize, ParseError> {
    let leading: &str = &line[..line.len() - line.trim_start_matches([' ', '\t']).len()];
    if leading.contains('\t') {
        return Err(ParseError::new(
            ParseErrorKind::InvalidIndentation,
            number,
            "tab character in indentation; indent with spaces",
        ));
    }
    let width = leading.len();
    if width % indent_unit != 0 {
        return Err(ParseError::new(
            ParseErrorKind::InvalidIndentation,
            number,
            format!(
                "indentation of {} spaces is not a multiple of {}",
                width, indent_unit
            ),
        ));
    }
    Ok(width / indent_unit)
}
