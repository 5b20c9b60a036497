//! Front-matter splitting.
//!
//! A content file optionally opens with a YAML mapping fenced by `---` lines:
//!
//! ```text
//! ---
//! title: "Alpha"
//! date: 2024-01-10
//! tags: [x, y]
//! ---
//! Body text, kept verbatim.
//! ```
//!
//! Files that do not start with a `---` line have no metadata; the whole
//! text is the body.

use serde_json::{Map, Value};
use serde_yaml::{Mapping, Value as YamlValue};
use thiserror::Error;

const DELIMITER: &str = "---";

/// Why a content file's header could not be turned into metadata.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot read file")]
    Io(#[from] std::io::Error),

    #[error("front-matter opened with `---` is never closed")]
    Unterminated,

    #[error("front-matter must be a mapping of keys to values")]
    NotAMapping,

    #[error("front-matter keys must be strings, numbers, or booleans")]
    ComplexKey,

    #[error("invalid front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A content file split into its parsed header and raw body.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter<'a> {
    pub metadata: Map<String, Value>,
    pub body: &'a str,
}

/// Split `text` into front-matter metadata and body.
pub fn split(text: &str) -> Result<FrontMatter<'_>, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let Some(rest) = strip_delimiter_line(text) else {
        return Ok(FrontMatter {
            metadata: Map::new(),
            body: text,
        });
    };

    let (yaml, body) = find_closing(rest).ok_or(ParseError::Unterminated)?;
    Ok(FrontMatter {
        metadata: parse_mapping(yaml)?,
        body,
    })
}

/// If `text` starts with a delimiter line, return what follows that line.
fn strip_delimiter_line(text: &str) -> Option<&str> {
    let (first, rest) = match text.find('\n') {
        Some(pos) => (&text[..pos], &text[pos + 1..]),
        None => (text, ""),
    };
    (first.trim_end() == DELIMITER).then_some(rest)
}

/// Locate the closing delimiter line; returns (yaml, body).
fn find_closing(rest: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

fn parse_mapping(yaml: &str) -> Result<Map<String, Value>, ParseError> {
    if yaml.trim().is_empty() {
        return Ok(Map::new());
    }
    match untag(serde_yaml::from_str(yaml)?) {
        YamlValue::Null => Ok(Map::new()),
        YamlValue::Mapping(mapping) => to_json_map(mapping),
        _ => Err(ParseError::NotAMapping),
    }
}

/// Drop YAML tags such as `!custom`, keeping the tagged value.
fn untag(value: YamlValue) -> YamlValue {
    match value {
        YamlValue::Tagged(tagged) => untag(tagged.value),
        value => value,
    }
}

/// Convert a YAML mapping to a JSON object.
///
/// Scalar keys are stringified the way YAML prints them (`2024`, `true`,
/// `null`), since JSON object keys are always strings.
fn to_json_map(mapping: Mapping) -> Result<Map<String, Value>, ParseError> {
    mapping
        .into_iter()
        .map(|(key, value)| Ok((key_to_string(key)?, to_json(value)?)))
        .collect()
}

fn key_to_string(key: YamlValue) -> Result<String, ParseError> {
    match untag(key) {
        YamlValue::String(s) => Ok(s),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Null => Ok("null".to_owned()),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) | YamlValue::Tagged(_) => {
            Err(ParseError::ComplexKey)
        }
    }
}

fn to_json(value: YamlValue) -> Result<Value, ParseError> {
    Ok(match untag(value) {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => number_to_json(&n),
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(seq) => {
            Value::Array(seq.into_iter().map(to_json).collect::<Result<_, _>>()?)
        }
        YamlValue::Mapping(mapping) => Value::Object(to_json_map(mapping)?),
        YamlValue::Tagged(tagged) => to_json(tagged.value)?,
    })
}

/// `.nan` and `.inf` have no JSON form and become `null`.
fn number_to_json(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::from(i)
    } else if let Some(u) = n.as_u64() {
        Value::from(u)
    } else {
        n.as_f64()
            .and_then(serde_json::Number::from_f64)
            .map_or(Value::Null, Value::Number)
    }
}
