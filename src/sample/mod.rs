//! Sample value selection.
//!
//! Decides which raw column values are safe to surface as examples in the
//! rendered schema. This is the single place where content redaction policy
//! lives: email addresses and links suppress a whole column, a temporal
//! value stands in for the whole column, and blank values are dropped.
//!
//! The scan is order-sensitive: the first disqualifying value ends it.
//!
//! ```text
//! [Text("CN"), Text("US"), Null, Text("DE")]   -> ["CN", "US", "DE"]
//! [Integer(1), Text("a@b.com"), Text("x")]     -> []
//! [Text("x"), Temporal("2024-01-01"), ...]     -> ["2024-01-01"]
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.-]+@[\w.-]+\.\w+$").expect("valid email pattern"));

/// A raw value fetched from a column, before stringification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SampleValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    /// A date, time or timestamp in its canonical text form.
    Temporal(String),
    /// Binary payload; only its length is kept.
    Blob(usize),
}

impl SampleValue {
    /// Create a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Create a temporal value.
    pub fn temporal(value: impl Into<String>) -> Self {
        Self::Temporal(value.into())
    }

    /// Whether this value carries no displayable content.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Null | Self::Blob(_))
    }
}

impl fmt::Display for SampleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Real(r) => write!(f, "{}", r),
            Self::Text(s) | Self::Temporal(s) => f.write_str(s),
            Self::Blob(len) => write!(f, "<{} bytes>", len),
        }
    }
}

impl From<&str> for SampleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SampleValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SampleValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for SampleValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for SampleValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<SampleValue>> From<Option<T>> for SampleValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SampleValue::Null)
    }
}

/// Whether a string looks like an email address.
pub fn is_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Whether a string contains an HTTP or HTTPS link.
pub fn contains_url(value: &str) -> bool {
    value.contains("http://") || value.contains("https://")
}

/// Select the display strings for one column's sample values.
pub fn select_examples(values: &[SampleValue]) -> Vec<String> {
    let mut selected = Vec::with_capacity(values.len());

    for value in values {
        match value {
            SampleValue::Temporal(v) => {
                selected = vec![v.clone()];
                break;
            }
            SampleValue::Text(s) if is_email(s) || contains_url(s) => {
                selected.clear();
                break;
            }
            v if v.is_absent() => continue,
            v => selected.push(v.to_string()),
        }
    }

    selected.retain(|s| !s.trim().is_empty());
    selected
}

/// Apply [`select_examples`] to values that are already strings.
pub fn select_text_examples<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    let values: Vec<SampleValue> = values
        .iter()
        .map(|s| SampleValue::text(s.as_ref()))
        .collect();
    select_examples(&values)
}
