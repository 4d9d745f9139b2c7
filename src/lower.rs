//! Schema documents: the JSON form of a `Schema`, and lowering into it.
//!
//! ```json
//! {"type": "array", "item": {
//!     "type": "complex", "name": "CM",
//!     "fields": {"i": "integer", "s": "string"}
//! }}
//! ```
//!
//! Field order is document order.
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{LoadError, SchemaError};
use crate::render::Layout;
use crate::schema::{ComplexType, Field, PrimitiveKind, Schema};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaDoc {
    /// `"integer"`
    Kind(PrimitiveKind),
    Node(NodeDoc),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeDoc {
    Primitive {
        kind: PrimitiveKind,
        #[serde(default)]
        layout: Option<Layout>,
    },
    Complex(ComplexDoc),
    Array {
        item: Box<SchemaDoc>,
        #[serde(default)]
        min_occurs: u32,
        #[serde(default)]
        max_occurs: Option<u32>,
        #[serde(default)]
        layout: Option<Layout>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplexDoc {
    pub name: String,
    #[serde(default)]
    pub base: Option<Box<ComplexDoc>>,
    #[serde(default)]
    pub fields: IndexMap<String, SchemaDoc>,
    #[serde(default)]
    pub layout: Option<Layout>,
}

pub fn lower_to_schema(doc: &SchemaDoc) -> Result<Schema, SchemaError> {
    match doc {
        SchemaDoc::Kind(kind) => Ok(Schema::primitive(*kind)),
        SchemaDoc::Node(NodeDoc::Primitive { kind, layout }) => Ok(with_layout(Schema::primitive(*kind), *layout)),
        SchemaDoc::Node(NodeDoc::Complex(c)) => Ok(with_layout(Schema::complex(lower_complex(c)?), c.layout)),
        SchemaDoc::Node(NodeDoc::Array { item, min_occurs, max_occurs, layout }) => {
            let item = lower_to_schema(item)?;
            Ok(with_layout(Schema::array(item).with_occurs(*min_occurs, *max_occurs), *layout))
        }
    }
}

fn lower_complex(doc: &ComplexDoc) -> Result<Arc<ComplexType>, SchemaError> {
    let fields = doc
        .fields
        .iter()
        .map(|(name, field)| Ok(Field::new(name.clone(), lower_to_schema(field)?)))
        .collect::<Result<Vec<_>, SchemaError>>()?;
    match &doc.base {
        Some(base) => ComplexType::derive(doc.name.clone(), lower_complex(base)?, fields),
        None => ComplexType::new(doc.name.clone(), fields),
    }
}

fn with_layout(schema: Schema, layout: Option<Layout>) -> Schema {
    match layout {
        Some(layout) => schema.with_layout(layout),
        None => schema,
    }
}

pub fn load_schema(path: &Path) -> Result<Schema, LoadError> {
    let doc: SchemaDoc = crate::path_de::read_json_file(path)?;
    Ok(lower_to_schema(&doc)?)
}

pub fn parse_schema(src: &str) -> Result<Schema, LoadError> {
    let doc: SchemaDoc = crate::path_de::from_str_with_path(src)?;
    Ok(lower_to_schema(&doc)?)
}
