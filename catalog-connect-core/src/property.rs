//! Typed property values attached to items.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// The kind of value a metadata definition accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PropertyType {
    String,
    Instant,
    Url,
    Tag,
}

impl PropertyType {
    /// Upper-case name used when deriving metadata identifiers
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::String => "STRING",
            PropertyType::Instant => "INSTANT",
            PropertyType::Url => "URL",
            PropertyType::Tag => "TAG",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property value as stored on an item.
///
/// The set of variants is closed; every value knows how to render itself as
/// the JSON value the host persists through [`PropertyValue::stored_value`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PropertyValue {
    String(String),
    Instant(DateTime<Utc>),
    Url {
        url: String,
        label: Option<String>,
    },
    Tag(Vec<String>),
}

impl PropertyValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn instant(value: DateTime<Utc>) -> Self {
        Self::Instant(value)
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self::Url {
            url: url.into(),
            label: None,
        }
    }

    pub fn url_with_label(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Url {
            url: url.into(),
            label: Some(label.into()),
        }
    }

    pub fn tag<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Tag(values.into_iter().map(Into::into).collect())
    }

    /// The type this value satisfies
    pub fn property_type(&self) -> PropertyType {
        match self {
            PropertyValue::String(_) => PropertyType::String,
            PropertyValue::Instant(_) => PropertyType::Instant,
            PropertyValue::Url { .. } => PropertyType::Url,
            PropertyValue::Tag(_) => PropertyType::Tag,
        }
    }

    /// Render the value in the form the catalog stores it.
    pub fn stored_value(&self) -> Value {
        match self {
            PropertyValue::String(s) => Value::String(s.clone()),
            PropertyValue::Instant(t) => {
                Value::String(t.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            PropertyValue::Url { url, label: None } => json!({ "url": url }),
            PropertyValue::Url {
                url,
                label: Some(label),
            } => json!({ "url": url, "label": label }),
            PropertyValue::Tag(tags) => json!(tags),
        }
    }

    /// The string payload, if this is a string value
    pub fn as_string(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Instant(value)
    }
}
