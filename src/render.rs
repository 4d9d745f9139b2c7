//! Recursive table renderer.
//!
//! Walks a `Value` against its `Schema` depth-first and emits tables into a
//! `DocumentWriter`. Two layouts:
//! - column: one column per field, one row per array element
//! - row: one row per field (header cell + value cell), one table per record
//!
//! Nested complex/array fields become nested tables inside the value cell,
//! in the layout active for that node (a node's `layout` overrides it for
//! its subtree). Field order is always schema declaration order.
pub mod column;
pub mod row;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RenderError;
use crate::markup::{add_attr, Attrs, DocumentWriter, MarkupTree, ScopeHandle};
use crate::schema::{Schema, Shape};
use crate::value::{scalar, Scalar, Value};

pub(crate) static NULL: Value = Value::Null;

// ------------------------------- Options ---------------------------------- //

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// fields across the page
    #[default]
    Column,
    /// fields down the page
    Row,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Layout::Column => "column",
            Layout::Row => "row",
        })
    }
}

/// Per-call customization.
///
/// The two attribute options name the attribute to emit; `None` omits it.
/// When both name the same attribute the values are space-joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub field_name_attr: Option<String>,
    pub field_type_name_attr: Option<String>,
    pub header: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            field_name_attr: Some("class".to_string()),
            field_type_name_attr: Some("class".to_string()),
            header: true,
        }
    }
}

impl RenderOptions {
    pub fn without_field_name_attr(mut self) -> Self {
        self.field_name_attr = None;
        self
    }

    pub fn without_field_type_name_attr(mut self) -> Self {
        self.field_type_name_attr = None;
        self
    }

    pub fn without_header(mut self) -> Self {
        self.header = false;
        self
    }
}

// ------------------------------- Entry ------------------------------------ //

/// A configured renderer. Cheap to share; every `render` call builds its
/// own context, so one `HtmlTable` can serve concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct HtmlTable {
    layout: Layout,
    options: RenderOptions,
}

impl HtmlTable {
    pub fn new(layout: Layout, options: RenderOptions) -> Self {
        HtmlTable { layout, options }
    }

    pub fn column(options: RenderOptions) -> Self { Self::new(Layout::Column, options) }

    pub fn row(options: RenderOptions) -> Self { Self::new(Layout::Row, options) }

    pub fn layout(&self) -> Layout { self.layout }

    pub fn options(&self) -> &RenderOptions { &self.options }

    /// `name` is the top-level field name: the path root, and the header
    /// text for a bare array of primitives.
    pub fn render(
        &self,
        out: &mut dyn DocumentWriter,
        schema: &Schema,
        value: &Value,
        name: &str,
    ) -> Result<(), RenderError> {
        render(out, schema, value, name, self.layout, &self.options)
    }

    pub fn render_to_string(&self, schema: &Schema, value: &Value, name: &str) -> Result<String, RenderError> {
        let mut tree = MarkupTree::new();
        self.render(&mut tree, schema, value, name)?;
        Ok(tree.into_string())
    }
}

/// Render `value` (described by `schema`) into `out`.
///
/// On error the writer holds an unspecified partial document and should be
/// discarded.
pub fn render(
    out: &mut dyn DocumentWriter,
    schema: &Schema,
    value: &Value,
    name: &str,
    layout: Layout,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    debug!(name, %layout, schema = %schema.describe(), "render");
    let mut walker = Walker { out, options, layout, path: vec![name.to_string()] };
    let result = walker.with_layout(schema, |w| match w.layout {
        Layout::Column => w.column_top(name, schema, value),
        Layout::Row => w.row_top(name, schema, value),
    });
    match &result {
        Ok(()) => debug!(name, "render done"),
        Err(err) => debug!(name, %err, "render failed"),
    }
    result
}

// ------------------------------- Walker ----------------------------------- //

/// Per-call render context.
pub(crate) struct Walker<'w> {
    pub(crate) out: &'w mut dyn DocumentWriter,
    pub(crate) options: &'w RenderOptions,
    pub(crate) layout: Layout,
    path: Vec<String>,
}

impl<'w> Walker<'w> {
    pub(crate) fn depth(&self) -> usize { self.path.len() }

    pub(crate) fn path_string(&self) -> String {
        let mut out = String::new();
        for seg in &self.path {
            if !out.is_empty() && !seg.starts_with('[') {
                out.push('.');
            }
            out.push_str(seg);
        }
        out
    }

    pub(crate) fn enter<T>(
        &mut self,
        seg: impl Into<String>,
        f: impl FnOnce(&mut Self) -> Result<T, RenderError>,
    ) -> Result<T, RenderError> {
        self.path.push(seg.into());
        let out = f(self);
        self.path.pop();
        out
    }

    pub(crate) fn with_layout<T>(
        &mut self,
        schema: &Schema,
        f: impl FnOnce(&mut Self) -> Result<T, RenderError>,
    ) -> Result<T, RenderError> {
        let saved = self.layout;
        if let Some(layout) = schema.layout {
            self.layout = layout;
        }
        let out = f(self);
        self.layout = saved;
        out
    }

    pub(crate) fn open(&mut self, tag: &str, attrs: &Attrs) -> Result<ScopeHandle, RenderError> {
        Ok(self.out.open_scope(tag, attrs)?)
    }

    pub(crate) fn close(&mut self, scope: ScopeHandle) -> Result<(), RenderError> {
        Ok(self.out.close_scope(scope)?)
    }

    pub(crate) fn mismatch(&self, schema: &Schema, found: &Value) -> RenderError {
        RenderError::SchemaMismatch {
            path: self.path_string(),
            expected: schema.describe(),
            found: found.kind_name(),
        }
    }

    pub(crate) fn unsupported(&self, schema: &Schema) -> RenderError {
        RenderError::UnsupportedLayoutForShape {
            path: self.path_string(),
            layout: self.layout,
            shape: schema.describe(),
        }
    }

    /// Field-name and type-name attributes for a header or value cell.
    pub(crate) fn field_attrs(&self, name: Option<&str>, schema: &Schema) -> Attrs {
        let mut attrs = Attrs::new();
        if let (Some(key), Some(name)) = (self.options.field_name_attr.as_deref(), name) {
            add_attr(&mut attrs, key, name);
        }
        if let Some(key) = self.options.field_type_name_attr.as_deref() {
            add_attr(&mut attrs, key, &schema.type_names());
        }
        attrs
    }

    /// Fields of a record value; `None` for a null record.
    pub(crate) fn record<'v>(
        &self,
        schema: &Schema,
        value: &'v Value,
    ) -> Result<Option<&'v indexmap::IndexMap<String, Value>>, RenderError> {
        match value {
            Value::Record(fields) => Ok(Some(fields)),
            Value::Null => Ok(None),
            other => Err(self.mismatch(schema, other)),
        }
    }

    /// Elements of an array value; empty for a null array.
    pub(crate) fn items<'v>(&self, schema: &Schema, value: &'v Value) -> Result<&'v [Value], RenderError> {
        match value {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(&[]),
            other => Err(self.mismatch(schema, other)),
        }
    }

    pub(crate) fn write_primitive(&mut self, schema: &Schema, value: &Value) -> Result<(), RenderError> {
        let Shape::Primitive(kind) = &schema.shape else {
            return Err(self.mismatch(schema, value));
        };
        let href_attrs = |href: &str| {
            let mut attrs = Attrs::new();
            attrs.insert("href".to_string(), href.to_string());
            attrs
        };
        match scalar(*kind, value, &self.path_string())? {
            Scalar::Text(text) => self.out.write_current(&text)?,
            Scalar::Link(uri) => {
                self.out.text_element("a", &href_attrs(&uri.href), uri.display_text())?;
            }
            Scalar::Href(href) => {
                self.out.text_element("a", &href_attrs(href), href)?;
            }
        }
        Ok(())
    }

    /// Default content of a value cell.
    pub(crate) fn cell_content(&mut self, name: &str, schema: &Schema, value: &Value) -> Result<(), RenderError> {
        if value.is_null() {
            return Ok(());
        }
        match &schema.shape {
            Shape::Primitive(_) => self.write_primitive(schema, value),
            // the caller already ran this node's hooks for the cell
            Shape::Complex(_) => self.with_layout(schema, |w| match w.layout {
                Layout::Column => w.column_table(name, schema, std::slice::from_ref(value), false, None),
                Layout::Row => w.row_table(schema, value),
            }),
            Shape::Array(arr) => self.with_layout(schema, |w| {
                let items = w.items(schema, value)?;
                match w.layout {
                    Layout::Column => w.column_table(name, &arr.item, items, true, arr.item.sub_protocol.as_deref()),
                    Layout::Row => w.row_array(&arr.item, items),
                }
            }),
        }
    }
}

pub(crate) fn table_attrs(schema: &Schema) -> Attrs {
    let mut attrs = Attrs::new();
    attrs.insert("class".to_string(), schema.type_name());
    attrs
}
