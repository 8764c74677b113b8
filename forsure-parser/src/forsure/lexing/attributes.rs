//! Attribute blocks
//!
//!     A declaration may end with a flat `{ key: value, ... }` block. The block is tokenized
//!     with logos and folded into an [Attributes] map.
//!
//! Grammar
//!
//!     <block> = "{" (<entry> ("," <entry>)* ","?)? "}"
//!     <entry> = <key> ":" <value>
//!     <key>   = [A-Za-z0-9_.-]+
//!     <value> = <quoted> | <bare>+
//!
//!     A bare value runs up to the next comma or closing brace and may contain spaces and
//!     colons (`url: http://localhost:3000`). Bare values are coerced (see
//!     [AttributeValue::coerce]); quoted values are always text and understand the escapes
//!     `\"`, `\\`, `\n` and `\t`.

use crate::forsure::ast::{AttributeValue, Attributes};
use logos::Logos;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static ATTRIBUTE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("valid attribute key regex"));

/// Tokens of an attribute block
#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(skip r"[ \t]+")]
pub enum AttributeToken {
    #[token("{")]
    OpenBrace,

    #[token("}")]
    CloseBrace,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,

    #[regex(r#""([^"\\]|\\.)*""#)]
    Quoted,

    // Anything that is not whitespace or punctuation
    #[regex(r#"[^ \t{}:,"]+"#)]
    Bare,
}

/// Tokenize a block, keeping each token's byte range.
pub fn tokenize(block: &str) -> Result<Vec<(AttributeToken, Range<usize>)>, String> {
    let mut lexer = AttributeToken::lexer(block);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next() {
        match token {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => {
                return Err(format!(
                    "unexpected `{}` in attribute block (unterminated quote?)",
                    lexer.slice()
                ))
            }
        }
    }
    Ok(tokens)
}

pub fn is_valid_key(key: &str) -> bool {
    ATTRIBUTE_KEY.is_match(key)
}

/// Parse an attribute block starting at `{`.
///
/// The error is a bare message; the caller knows the line number.
pub fn parse_attribute_block(block: &str) -> Result<Attributes, String> {
    let tokens = tokenize(block)?;
    let mut cursor = tokens.iter();
    let mut attributes = Attributes::new();

    match cursor.next() {
        Some((AttributeToken::OpenBrace, _)) => {}
        _ => return Err("attribute block must start with `{`".to_string()),
    }

    loop {
        let key = match cursor.next() {
            Some((AttributeToken::CloseBrace, _)) => break,
            Some((AttributeToken::Bare, span)) => &block[span.clone()],
            Some((_, span)) => {
                return Err(format!(
                    "expected an attribute key, found `{}`",
                    &block[span.clone()]
                ))
            }
            None => return Err("attribute block is not closed with `}`".to_string()),
        };
        if !is_valid_key(key) {
            return Err(format!("invalid attribute key `{}`", key));
        }
        match cursor.next() {
            Some((AttributeToken::Colon, _)) => {}
            _ => return Err(format!("expected `:` after attribute key `{}`", key)),
        }

        let mut value_tokens: Vec<&(AttributeToken, Range<usize>)> = Vec::new();
        let terminator = loop {
            match cursor.next() {
                Some((AttributeToken::Comma, _)) => break AttributeToken::Comma,
                Some((AttributeToken::CloseBrace, _)) => break AttributeToken::CloseBrace,
                Some((AttributeToken::OpenBrace, _)) => {
                    return Err("nested attribute blocks are not supported".to_string())
                }
                Some(token) => value_tokens.push(token),
                None => return Err("attribute block is not closed with `}`".to_string()),
            }
        };

        let value = attribute_value(block, key, &value_tokens)?;
        if attributes.insert(key.to_string(), value).is_some() {
            return Err(format!("duplicate attribute key `{}`", key));
        }

        if terminator == AttributeToken::CloseBrace {
            break;
        }
    }

    if let Some((_, span)) = cursor.next() {
        return Err(format!(
            "unexpected `{}` after the attribute block",
            &block[span.start..]
        ));
    }
    Ok(attributes)
}

fn attribute_value(
    block: &str,
    key: &str,
    tokens: &[&(AttributeToken, Range<usize>)],
) -> Result<AttributeValue, String> {
    match tokens {
        [] => Err(format!("attribute `{}` has no value", key)),
        [(AttributeToken::Quoted, span)] => Ok(AttributeValue::Text(unescape(
            &block[span.start + 1..span.end - 1],
        ))),
        _ if tokens.iter().any(|(token, _)| *token == AttributeToken::Quoted) => Err(format!(
            "attribute `{}` mixes quoted and unquoted text",
            key
        )),
        [first, .., last] => Ok(AttributeValue::coerce(&block[first.1.start..last.1.end])),
        [only] => Ok(AttributeValue::coerce(&block[only.1.clone()])),
    }
}

fn unescape(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            text.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => text.push('\n'),
            Some('t') => text.push('\t'),
            Some(other) => text.push(other),
            None => text.push('\\'),
        }
    }
    text
}

fn needs_quotes(text: &str) -> bool {
    text.is_empty()
        || text.trim() != text
        || text
            .chars()
            .any(|c| matches!(c, '{' | '}' | ':' | ',' | '"' | '\\') || c.is_control())
        || !matches!(AttributeValue::coerce(text), AttributeValue::Text(_))
}

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

/// Render a value so that [parse_attribute_block] reads it back unchanged.
///
/// Non-finite floats have no literal form and are written as quoted text.
pub fn format_attribute_value(value: &AttributeValue) -> String {
    match value {
        AttributeValue::Text(text) if needs_quotes(text) => quote(text),
        AttributeValue::Float(float) if !float.is_finite() => quote(&value.to_string()),
        _ => value.to_string(),
    }
}

/// Render a whole block, `{ a: 1, b: two }`. Empty maps render as an empty string.
pub fn format_attribute_block(attributes: &Attributes) -> String {
    if attributes.is_empty() {
        return String::new();
    }
    let entries: Vec<String> = attributes
        .iter()
        .map(|(key, value)| format!("{}: {}", key, format_attribute_value(value)))
        .collect();
    format!("{{ {} }}", entries.join(", "))
}
