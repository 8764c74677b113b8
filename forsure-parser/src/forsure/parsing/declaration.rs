//! Structural line grammar
//!
//!     Every structural line is one of:
//!
//!         root: [{attrs}]             the header, first structural line only
//!         - name[:|/][ {attrs}]       a terse declaration
//!         - Type: File|Directory      opens a verbose entry
//!         - Key: value                a field of the open verbose entry
//!
//!     A terse name can never contain `": "`, so a line of the form `- Key: value` whose value
//!     does not start with `{` is always a verbose field. This keeps the two dialects apart
//!     without lookahead.

use crate::forsure::ast::{AttributeValue, Attributes};
use crate::forsure::lexing::attributes::parse_attribute_block;
use once_cell::sync::Lazy;
use regex::Regex;

pub const ROOT_HEADER: &str = "root:";

static FIELD_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("valid field key regex"));

/// One structural line, decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration<'a> {
    Header {
        attributes: Attributes,
    },
    Terse {
        name: String,
        is_directory: bool,
        attributes: Attributes,
    },
    VerboseType {
        is_directory: bool,
    },
    VerboseField {
        key: &'a str,
        value: &'a str,
    },
}

/// A verbose field after interpretation.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Name(String),
    Attribute(String, AttributeValue),
}

pub fn is_header(content: &str) -> bool {
    content == ROOT_HEADER
        || content
            .strip_prefix(ROOT_HEADER)
            .is_some_and(|rest| rest.trim_start().starts_with('{'))
}

/// Decode a trimmed structural line. Errors are plain messages; the parser adds the line.
pub fn parse_declaration(content: &str) -> Result<Declaration<'_>, String> {
    if is_header(content) {
        let block = content[ROOT_HEADER.len()..].trim();
        let attributes = if block.is_empty() {
            Attributes::new()
        } else {
            parse_attribute_block(block)?
        };
        return Ok(Declaration::Header { attributes });
    }

    let body = match content.strip_prefix('-') {
        Some(rest) if rest.starts_with([' ', '\t']) => rest.trim(),
        Some(rest) if rest.is_empty() => return Err("declaration has no name".to_string()),
        _ => {
            return Err(format!(
                "expected a `- name` declaration, found `{}`",
                content
            ))
        }
    };

    if let Some((key, value)) = body.split_once(": ") {
        let value = value.trim();
        if FIELD_KEY.is_match(key) && !value.is_empty() && !value.starts_with('{') {
            if key.eq_ignore_ascii_case("type") {
                return entry_type(value).map(|is_directory| Declaration::VerboseType { is_directory });
            }
            return Ok(Declaration::VerboseField { key, value });
        }
    }

    parse_terse(body)
}

fn entry_type(value: &str) -> Result<bool, String> {
    if value.eq_ignore_ascii_case("directory") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("file") {
        Ok(false)
    } else {
        Err(format!(
            "unknown entry type `{}` (expected File or Directory)",
            value
        ))
    }
}

fn parse_terse(body: &str) -> Result<Declaration<'static>, String> {
    let (head, attributes) = match body.find('{') {
        Some(index) => (&body[..index], parse_attribute_block(&body[index..])?),
        None => (body, Attributes::new()),
    };

    let mut name = head.trim();
    let mut is_directory = false;
    if let Some(stripped) = name.strip_suffix(':') {
        name = stripped.trim_end();
        is_directory = true;
    }
    if let Some(stripped) = name.strip_suffix('/') {
        name = stripped;
        is_directory = true;
    }
    validate_name(name)?;

    Ok(Declaration::Terse {
        name: name.to_string(),
        is_directory,
        attributes,
    })
}

/// Interpret a verbose `Key: value` field.
pub fn parse_field(key: &str, value: &str) -> Result<Field, String> {
    if key.eq_ignore_ascii_case("name") {
        let name = value.strip_suffix('/').unwrap_or(value);
        validate_name(name)?;
        return Ok(Field::Name(name.to_string()));
    }
    Ok(Field::Attribute(
        key.to_ascii_lowercase(),
        AttributeValue::coerce(value),
    ))
}

/// Names are single path segments.
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("declaration has no name".to_string());
    }
    if name == "." || name == ".." {
        return Err(format!("`{}` is not a valid name", name));
    }
    if let Some(bad) = name.chars().find(|c| matches!(c, '{' | '}' | '/' | '\\')) {
        return Err(format!("name `{}` contains `{}`", name, bad));
    }
    if name.ends_with(':') {
        return Err(format!(
            "name `{}` ends with `:`, which terse text reads as a directory marker",
            name
        ));
    }
    if name.contains(": ") {
        return Err(format!(
            "name `{}` contains `: `; only verbose fields use `Key: value`",
            name
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terse(name: &str, is_directory: bool) -> Declaration<'static> {
        Declaration::Terse {
            name: name.to_string(),
            is_directory,
            attributes: Attributes::new(),
        }
    }

    #[test]
    fn test_header() {
        assert_eq!(
            parse_declaration("root:"),
            Ok(Declaration::Header {
                attributes: Attributes::new()
            })
        );
        let Ok(Declaration::Header { attributes }) = parse_declaration("root: { version: 2 }")
        else {
            panic!("expected header");
        };
        assert_eq!(attributes["version"], AttributeValue::Integer(2));
    }

    #[test]
    fn test_terse_forms() {
        assert_eq!(parse_declaration("- index.js"), Ok(terse("index.js", false)));
        assert_eq!(parse_declaration("- src:"), Ok(terse("src", true)));
        assert_eq!(parse_declaration("- src/"), Ok(terse("src", true)));
        assert_eq!(parse_declaration("- src/:"), Ok(terse("src", true)));
        assert_eq!(parse_declaration("- my docs :"), Ok(terse("my docs", true)));
    }

    #[test]
    fn test_terse_with_attributes() {
        let Ok(Declaration::Terse {
            name,
            is_directory,
            attributes,
        }) = parse_declaration("- src: { generated: true }")
        else {
            panic!("expected terse declaration");
        };
        assert_eq!(name, "src");
        assert!(is_directory);
        assert_eq!(attributes["generated"], AttributeValue::Bool(true));

        let Ok(Declaration::Terse { is_directory, .. }) = parse_declaration("- a.txt {size: 3}")
        else {
            panic!("expected terse declaration");
        };
        assert!(!is_directory);
    }

    #[test]
    fn test_verbose_lines() {
        assert_eq!(
            parse_declaration("- Type: Directory"),
            Ok(Declaration::VerboseType { is_directory: true })
        );
        assert_eq!(
            parse_declaration("- type: file"),
            Ok(Declaration::VerboseType {
                is_directory: false
            })
        );
        assert_eq!(
            parse_declaration("- Name: src/"),
            Ok(Declaration::VerboseField {
                key: "Name",
                value: "src/"
            })
        );
        assert!(parse_declaration("- Type: Folder")
            .unwrap_err()
            .contains("unknown entry type"));
    }

    #[test]
    fn test_fields() {
        assert_eq!(parse_field("Name", "src/"), Ok(Field::Name("src".to_string())));
        assert_eq!(
            parse_field("Path", "./"),
            Ok(Field::Attribute("path".to_string(), AttributeValue::from("./")))
        );
        assert_eq!(
            parse_field("Size", "12"),
            Ok(Field::Attribute("size".to_string(), AttributeValue::Integer(12)))
        );
        assert!(parse_field("Name", "..").is_err());
    }

    #[test]
    fn test_names_cannot_end_with_colon() {
        assert!(parse_field("Name", "notes:").is_err());
        assert!(parse_field("Name", "notes:/").is_err());
        assert!(parse_declaration("- notes::").is_err());
        assert!(parse_declaration("- notes:/").is_err());
        assert_eq!(parse_field("Name", "a:b"), Ok(Field::Name("a:b".to_string())));
        assert_eq!(parse_declaration("- a:b"), Ok(terse("a:b", false)));
    }

    #[test]
    fn test_malformed_lines() {
        for line in ["src:", "-", "-src", "- {a: 1}", "- a/b", "- ..", "- a { b: }", "- my file: x"] {
            assert!(parse_declaration(line).is_err(), "{line} should be rejected");
        }
    }
}
