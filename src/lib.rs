//! Render schema-described values as nested HTML tables.
//!
//! A `Value` is walked against its `Schema` and written through a
//! `DocumentWriter` in one of two layouts (`Layout::Column`,
//! `Layout::Row`). Individual schema nodes can carry a `SubProtocol` that
//! takes over their header, row bracketing or cell content.
pub mod cli;
pub mod decode;
pub mod error;
pub mod lower;
pub mod markup;
pub mod oset;
pub mod path_de;
pub mod render;
pub mod schema;
pub mod subprot;
pub mod value;

pub use error::{DecodeError, LoadError, RenderError, SchemaError, WriteError};
pub use markup::{Attrs, DocumentWriter, MarkupTree, NodeId, ScopeHandle};
pub use oset::OrderedSet;
pub use render::{render, HtmlTable, Layout, RenderOptions};
pub use schema::{ArrayType, ComplexType, Field, PrimitiveKind, Schema, Shape};
pub use subprot::{Hook, ScopeStack, Site, SubProtocol};
pub use value::{primitive_text, Uri, Value};
