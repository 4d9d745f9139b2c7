//! Schema-directed decoding of JSON documents into `Value` trees.
//!
//! - `anyURI` accepts a string or `{"href": …, "text": …}`
//! - `date` is `YYYY-MM-DD`, `dateTime` is RFC 3339
//! - object keys the schema doesn't declare are dropped
use chrono::{DateTime, NaiveDate};
use indexmap::IndexMap;
use serde_json::Value as Json;

use crate::error::DecodeError;
use crate::schema::{PrimitiveKind, Schema, Shape};
use crate::value::{Uri, Value};

pub fn decode(json: &Json, schema: &Schema) -> Result<Value, DecodeError> {
    decode_at(json, schema, "")
}

fn decode_at(json: &Json, schema: &Schema, path: &str) -> Result<Value, DecodeError> {
    if json.is_null() {
        return Ok(Value::Null);
    }
    match &schema.shape {
        Shape::Primitive(kind) => decode_scalar(json, *kind, path),
        Shape::Complex(ty) => {
            let Json::Object(map) = json else {
                return Err(expected(path, format!("object for `{}`", ty.name())));
            };
            let mut fields = IndexMap::new();
            for field in ty.fields() {
                if let Some(raw) = map.get(&field.name) {
                    let value = decode_at(raw, &field.schema, &join(path, &field.name))?;
                    fields.insert(field.name.clone(), value);
                }
            }
            Ok(Value::Record(fields))
        }
        Shape::Array(arr) => {
            let Json::Array(items) = json else {
                return Err(expected(path, format!("array of {}", arr.item.describe())));
            };
            items
                .iter()
                .enumerate()
                .map(|(i, item)| decode_at(item, &arr.item, &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
    }
}

fn decode_scalar(json: &Json, kind: PrimitiveKind, path: &str) -> Result<Value, DecodeError> {
    let value = match (kind, json) {
        (PrimitiveKind::Boolean, Json::Bool(b)) => Value::Bool(*b),
        (PrimitiveKind::Integer, Json::Number(n)) if n.is_i64() => Value::Integer(n.as_i64().unwrap_or_default()),
        (PrimitiveKind::Float, Json::Number(n)) => match n.as_f64() {
            Some(f) => Value::float(f),
            None => return Err(expected(path, "float")),
        },
        (PrimitiveKind::String, Json::String(s)) => Value::Text(s.clone()),
        (PrimitiveKind::AnyUri, Json::String(s)) => Value::Uri(Uri::new(s.clone())),
        (PrimitiveKind::AnyUri, Json::Object(map)) => {
            let Some(href) = map.get("href").and_then(Json::as_str) else {
                return Err(expected(path, "anyURI object with a string `href`"));
            };
            match map.get("text").and_then(Json::as_str) {
                Some(text) => Value::Uri(Uri::with_text(href, text)),
                None => Value::Uri(Uri::new(href)),
            }
        }
        (PrimitiveKind::Date, Json::String(s)) => {
            let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|source| DecodeError::BadDate {
                path: path.to_string(),
                raw: s.clone(),
                source,
            })?;
            Value::Date(date)
        }
        (PrimitiveKind::DateTime, Json::String(s)) => {
            let dt = DateTime::parse_from_rfc3339(s).map_err(|source| DecodeError::BadDateTime {
                path: path.to_string(),
                raw: s.clone(),
                source,
            })?;
            Value::DateTime(dt)
        }
        (kind, _) => return Err(expected(path, kind.type_name())),
    };
    Ok(value)
}

fn join(path: &str, field: &str) -> String {
    if path.is_empty() { field.to_string() } else { format!("{path}.{field}") }
}

fn expected(path: &str, what: impl Into<String>) -> DecodeError {
    let path = if path.is_empty() { "$".to_string() } else { path.to_string() };
    DecodeError::Expected { path, expected: what.into() }
}
