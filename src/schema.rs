//! Schema model the renderer walks.
//!
//! A `Schema` node is one of three shapes (primitive, complex, array) plus
//! the per-node customization: a layout override and an optional attached
//! sub-protocol. Schemas are trees; complex types are shared through `Arc`
//! so one declaration can back many fields and concurrent renders.
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::oset::OrderedSet;
use crate::render::Layout;
use crate::subprot::SubProtocol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrimitiveKind {
    Boolean,
    Integer,
    Float,
    String,
    #[serde(rename = "anyURI", alias = "anyUri", alias = "uri")]
    AnyUri,
    Date,
    DateTime,
}

impl PrimitiveKind {
    pub fn type_name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Float => "float",
            PrimitiveKind::String => "string",
            PrimitiveKind::AnyUri => "anyURI",
            PrimitiveKind::Date => "date",
            PrimitiveKind::DateTime => "dateTime",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

#[derive(Clone, Debug)]
pub struct Schema {
    pub shape: Shape,
    /// Overrides the active layout for this node and everything below it.
    pub layout: Option<Layout>,
    pub sub_protocol: Option<Arc<dyn SubProtocol>>,
}

#[derive(Clone, Debug)]
pub enum Shape {
    Primitive(PrimitiveKind),
    Complex(Arc<ComplexType>),
    Array(ArrayType),
}

#[derive(Clone, Debug)]
pub struct ArrayType {
    pub item: Box<Schema>,
    pub min_occurs: u32,
    pub max_occurs: Option<u32>, // None = unbounded
}

#[derive(Clone, Debug)]
pub struct Field {
    pub name: String,
    pub schema: Schema,
}

#[derive(Debug)]
pub struct ComplexType {
    name: String,
    base: Option<Arc<ComplexType>>,
    fields: Vec<Field>, // declaration order
    flat: Vec<Field>,   // effective order, base chain included
}

impl Schema {
    fn from_shape(shape: Shape) -> Self {
        Schema { shape, layout: None, sub_protocol: None }
    }

    pub fn primitive(kind: PrimitiveKind) -> Self { Self::from_shape(Shape::Primitive(kind)) }
    pub fn boolean() -> Self { Self::primitive(PrimitiveKind::Boolean) }
    pub fn integer() -> Self { Self::primitive(PrimitiveKind::Integer) }
    pub fn float() -> Self { Self::primitive(PrimitiveKind::Float) }
    pub fn string() -> Self { Self::primitive(PrimitiveKind::String) }
    pub fn any_uri() -> Self { Self::primitive(PrimitiveKind::AnyUri) }
    pub fn date() -> Self { Self::primitive(PrimitiveKind::Date) }
    pub fn date_time() -> Self { Self::primitive(PrimitiveKind::DateTime) }

    pub fn complex(ty: Arc<ComplexType>) -> Self { Self::from_shape(Shape::Complex(ty)) }

    pub fn array(item: Schema) -> Self {
        Self::from_shape(Shape::Array(ArrayType {
            item: Box::new(item),
            min_occurs: 0,
            max_occurs: None,
        }))
    }

    pub fn with_occurs(mut self, min_occurs: u32, max_occurs: Option<u32>) -> Self {
        if let Shape::Array(arr) = &mut self.shape {
            arr.min_occurs = min_occurs;
            arr.max_occurs = max_occurs;
        }
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_sub_protocol(mut self, prot: Arc<dyn SubProtocol>) -> Self {
        self.sub_protocol = Some(prot);
        self
    }

    /// Single type name: the table class.
    pub fn type_name(&self) -> String {
        match &self.shape {
            Shape::Primitive(kind) => kind.type_name().to_string(),
            Shape::Complex(ty) => ty.name.clone(),
            Shape::Array(arr) => format!("{}Array", arr.item.type_name()),
        }
    }

    /// Type name plus every base type name, most-derived first.
    pub fn type_names(&self) -> String {
        match &self.shape {
            Shape::Complex(ty) => ty.lineage().map(|t| t.name.as_str()).collect::<Vec<_>>().join(" "),
            _ => self.type_name(),
        }
    }

    pub fn describe(&self) -> String {
        match &self.shape {
            Shape::Primitive(kind) => kind.type_name().to_string(),
            Shape::Complex(ty) => format!("complex `{}`", ty.name),
            Shape::Array(arr) => format!("array of {}", arr.item.describe()),
        }
    }
}

impl ComplexType {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Result<Arc<Self>, SchemaError> {
        Self::build(name.into(), None, fields)
    }

    /// Declare a subtype: `base` fields come first in every layout.
    pub fn derive(
        name: impl Into<String>,
        base: Arc<ComplexType>,
        fields: Vec<Field>,
    ) -> Result<Arc<Self>, SchemaError> {
        Self::build(name.into(), Some(base), fields)
    }

    fn build(name: String, base: Option<Arc<ComplexType>>, fields: Vec<Field>) -> Result<Arc<Self>, SchemaError> {
        if name.is_empty() {
            return Err(SchemaError::EmptyTypeName);
        }
        let mut seen = OrderedSet::new();
        if let Some(dup) = fields.iter().find(|f| !seen.insert(f.name.as_str())) {
            return Err(SchemaError::DuplicateField { ty: name, field: dup.name.clone() });
        }
        let flat = flatten(base.as_deref(), &fields);
        Ok(Arc::new(ComplexType { name, base, fields, flat }))
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn base(&self) -> Option<&Arc<ComplexType>> { self.base.as_ref() }

    /// Fields declared on this type only.
    pub fn own_fields(&self) -> &[Field] { &self.fields }

    /// Self, then base, then base's base, ...
    pub fn lineage(&self) -> impl Iterator<Item = &ComplexType> {
        std::iter::successors(Some(self), |t| t.base.as_deref())
    }

    /// Effective fields in emission order, computed once at construction.
    pub fn fields(&self) -> &[Field] { &self.flat }

    pub fn column_names(&self) -> OrderedSet<String> {
        self.flat.iter().map(|f| f.name.clone()).collect()
    }
}

/// Base fields root-first, then `own`. A redeclared name keeps the position
/// of its first declaration and takes the most-derived schema.
fn flatten(base: Option<&ComplexType>, own: &[Field]) -> Vec<Field> {
    let inherited = base.map(|b| b.flat.as_slice()).unwrap_or_default();
    let mut order = OrderedSet::new();
    let mut by_name: HashMap<&str, &Schema> = HashMap::new();
    for field in inherited.iter().chain(own) {
        order.insert(field.name.as_str());
        by_name.insert(field.name.as_str(), &field.schema);
    }
    order
        .iter()
        .filter_map(|name| by_name.get(name).map(|schema| Field::new(*name, (*schema).clone())))
        .collect()
}

impl Field {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Field { name: name.into(), schema }
    }
}
