use chrono::{DateTime, FixedOffset, NaiveDate};
use indexmap::IndexMap;
use ordered_float::OrderedFloat;

use crate::error::RenderError;
use crate::schema::PrimitiveKind;

/// Runtime instance of a `Schema`.
///
/// `Record` keys may arrive in any order; rendering follows the schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(OrderedFloat<f64>),
    Text(String),
    Uri(Uri),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    Record(IndexMap<String, Value>),
    Array(Vec<Value>),
}

/// A link target with an optional display text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Uri {
    pub href: String,
    pub text: Option<String>,
}

impl Uri {
    pub fn new(href: impl Into<String>) -> Self {
        Uri { href: href.into(), text: None }
    }

    pub fn with_text(href: impl Into<String>, text: impl Into<String>) -> Self {
        Uri { href: href.into(), text: Some(text.into()) }
    }

    pub fn display_text(&self) -> &str {
        self.text.as_deref().unwrap_or(&self.href)
    }
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self { Value::Text(s.into()) }

    pub fn float(f: f64) -> Self { Value::Float(OrderedFloat(f)) }

    pub fn record<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Record(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Uri(_) => "uri",
            Value::Date(_) => "date",
            Value::DateTime(_) => "date-time",
            Value::Record(_) => "record",
            Value::Array(_) => "array",
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::Text(s.to_string()) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Value::Text(s) }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self { Value::Integer(i) }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}

impl From<Uri> for Value {
    fn from(u: Uri) -> Self { Value::Uri(u) }
}

// ------------------------------ Canonical text ---------------------------- //

/// What a scalar cell holds: plain text or a link.
pub enum Scalar<'a> {
    Text(String),
    Link(&'a Uri),
    Href(&'a str),
}

/// Canonical text for a scalar, as the renderer writes it into a cell.
///
/// Sub-protocols call this to stringify values the same way the core does.
/// `path` only feeds the error message.
pub fn primitive_text(kind: PrimitiveKind, value: &Value, path: &str) -> Result<String, RenderError> {
    Ok(match scalar(kind, value, path)? {
        Scalar::Text(s) => s,
        Scalar::Link(uri) => uri.href.clone(),
        Scalar::Href(href) => href.to_string(),
    })
}

pub(crate) fn scalar<'a>(kind: PrimitiveKind, value: &'a Value, path: &str) -> Result<Scalar<'a>, RenderError> {
    let text = match (kind, value) {
        (PrimitiveKind::Boolean, Value::Bool(b)) => b.to_string(),
        (PrimitiveKind::Integer, Value::Integer(i)) => i.to_string(),
        (PrimitiveKind::Float, Value::Integer(i)) => format!("{i}.0"),
        (PrimitiveKind::Float, Value::Float(f)) => format_float(f.0),
        (PrimitiveKind::String, Value::Text(s)) => s.clone(),
        (PrimitiveKind::AnyUri, Value::Uri(uri)) => return Ok(Scalar::Link(uri)),
        (PrimitiveKind::AnyUri, Value::Text(href)) => return Ok(Scalar::Href(href)),
        (PrimitiveKind::Date, Value::Date(d)) => d.format("%Y-%m-%d").to_string(),
        (PrimitiveKind::DateTime, Value::DateTime(dt)) => dt.to_rfc3339(),
        (kind, other) => {
            return Err(RenderError::SchemaMismatch {
                path: path.to_string(),
                expected: kind.type_name().to_string(),
                found: other.kind_name(),
            });
        }
    };
    Ok(Scalar::Text(text))
}

fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}
