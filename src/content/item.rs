//! A single post as stored in the content index.

use super::{
    date::PublishDate,
    frontmatter::{self, ParseError},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys owned by the index shape `{id, ...metadata, content}`.
pub const RESERVED_KEYS: &[&str] = &["id", "content"];

/// One parsed content file.
///
/// Serializes flat: `id`, then every metadata key (sorted), then `content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// File name without extension.
    pub id: String,

    /// Front-matter keys other than the reserved ones, passed through as-is.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,

    /// Markdown after the front-matter, un-rendered.
    #[serde(rename = "content", default)]
    pub body: String,
}

impl ContentItem {
    /// Parse a source file's text.
    ///
    /// Returns the item and non-fatal warnings (dropped reserved keys,
    /// unparseable dates). Header errors are fatal for this item only.
    pub fn parse(id: impl Into<String>, text: &str) -> Result<(Self, Vec<String>), ParseError> {
        let frontmatter::FrontMatter { mut metadata, body } = frontmatter::split(text)?;
        let mut warnings = Vec::new();

        for key in RESERVED_KEYS {
            if metadata.remove(*key).is_some() {
                warnings.push(format!("front-matter key `{key}` is reserved and was dropped"));
            }
        }

        let item = Self {
            id: id.into(),
            metadata,
            body: body.to_owned(),
        };

        if let Some(raw) = item.metadata.get("date")
            && item.date().is_none()
        {
            warnings.push(format!("date {raw} is not a calendar date, sorted last"));
        }

        Ok((item, warnings))
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(Value::as_str)
    }

    /// Parsed `date`, if present and valid.
    pub fn date(&self) -> Option<PublishDate> {
        self.metadata.get("date").and_then(PublishDate::from_value)
    }

    /// The raw `date` string as written in the front-matter.
    pub fn date_str(&self) -> Option<&str> {
        self.metadata.get("date").and_then(Value::as_str)
    }

    /// Tags as strings.
    ///
    /// `tags: [a, b]` yields each scalar element; `tags: a` yields one tag;
    /// anything else (missing, null, maps) yields none.
    pub fn tags(&self) -> Vec<String> {
        match self.metadata.get("tags") {
            Some(Value::Array(values)) => values.iter().filter_map(scalar_to_tag).collect(),
            Some(value) => scalar_to_tag(value).into_iter().collect(),
            None => Vec::new(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().iter().any(|t| t == tag)
    }
}

fn scalar_to_tag(value: &Value) -> Option<String> {
    let tag = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!tag.is_empty()).then_some(tag)
}
