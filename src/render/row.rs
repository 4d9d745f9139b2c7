//! Row layout: one row per field, header cell then value cell.
use tracing::trace;

use super::{table_attrs, Walker, NULL};
use crate::error::RenderError;
use crate::markup::Attrs;
use crate::schema::{Schema, Shape};
use crate::subprot::Site;
use crate::value::Value;

impl Walker<'_> {
    pub(crate) fn row_top(&mut self, name: &str, schema: &Schema, value: &Value) -> Result<(), RenderError> {
        match &schema.shape {
            Shape::Complex(_) => self.row_table(schema, value),
            Shape::Array(arr) => {
                let items = self.items(schema, value)?;
                match &arr.item.shape {
                    Shape::Primitive(_) => {
                        let div = self.open("div", &Attrs::new())?;
                        let mut class = Attrs::new();
                        class.insert("class".to_string(), name.to_string());
                        let table = self.open("table", &class)?;
                        let tr = self.open("tr", &Attrs::new())?;
                        let attrs = self.field_attrs(Some(name), schema);
                        if self.options.header {
                            self.out.text_element("th", &attrs, &arr.item.type_name())?;
                        }
                        let td = self.open("td", &attrs)?;
                        self.row_array(&arr.item, items)?;
                        self.close(td)?;
                        self.close(tr)?;
                        self.close(table)?;
                        self.close(div)
                    }
                    Shape::Complex(_) => {
                        let div = self.open("div", &Attrs::new())?;
                        self.row_array(&arr.item, items)?;
                        self.close(div)
                    }
                    Shape::Array(_) => Err(self.unsupported(schema)),
                }
            }
            Shape::Primitive(_) => Err(self.unsupported(schema)),
        }
    }

    /// `<table class=Type><tbody>` one row per field `</tbody></table>`.
    pub(crate) fn row_table(&mut self, schema: &Schema, value: &Value) -> Result<(), RenderError> {
        let Shape::Complex(ty) = &schema.shape else {
            return Err(self.mismatch(schema, value));
        };
        trace!(depth = self.depth(), table = %ty.name(), "row table");
        let record = self.record(schema, value)?;
        let table = self.open("table", &table_attrs(schema))?;
        let tbody = self.open("tbody", &Attrs::new())?;
        for f in ty.fields() {
            let field_value = record.and_then(|r| r.get(&f.name)).unwrap_or(&NULL);
            self.enter(&f.name, |w| w.row_field(&f.name, &f.schema, field_value))?;
        }
        self.close(tbody)?;
        self.close(table)
    }

    fn row_field(&mut self, field: &str, schema: &Schema, value: &Value) -> Result<(), RenderError> {
        let prot = schema.sub_protocol.as_deref();
        let path = self.path_string();
        let site = Site { name: field, schema, path: &path };
        let attrs = self.field_attrs(Some(field), schema);
        self.row_frame(prot, &site, value, Some(("tr", Attrs::new())), |w| {
            if w.options.header {
                w.header(prot, &site, |w| {
                    w.out.text_element("th", &attrs, field)?;
                    Ok(())
                })?;
            }
            let td = w.open("td", &attrs)?;
            w.content(prot, &site, value, |w| w.cell_content(field, schema, value))?;
            w.close(td)
        })
    }

    /// Array items laid out vertically.
    ///
    /// Scalars: `<table>` with one single-cell row each. Records: one row
    /// table each, side by side in the parent.
    pub(crate) fn row_array(&mut self, item: &Schema, items: &[Value]) -> Result<(), RenderError> {
        trace!(depth = self.depth(), item = %item.type_name(), len = items.len(), "row array");
        match &item.shape {
            Shape::Primitive(_) => {
                let table = self.open("table", &Attrs::new())?;
                for (i, value) in items.iter().enumerate() {
                    self.enter(format!("[{i}]"), |w| {
                        w.row_item(item, value, Some(("tr", Attrs::new())), |w| {
                            let td = w.open("td", &w.field_attrs(None, item))?;
                            w.cell_content("", item, value)?;
                            w.close(td)
                        })
                    })?;
                }
                self.close(table)
            }
            Shape::Complex(_) => {
                for (i, value) in items.iter().enumerate() {
                    self.enter(format!("[{i}]"), |w| {
                        w.row_item(item, value, None, |w| w.cell_content("", item, value))
                    })?;
                }
                Ok(())
            }
            Shape::Array(_) => Err(self.unsupported(item)),
        }
    }

    fn row_item(
        &mut self,
        item: &Schema,
        value: &Value,
        wrapper: Option<(&str, Attrs)>,
        default: impl FnOnce(&mut Self) -> Result<(), RenderError>,
    ) -> Result<(), RenderError> {
        let prot = item.sub_protocol.as_deref();
        let path = self.path_string();
        let name = item.type_name();
        let site = Site { name: &name, schema: item, path: &path };
        self.row_frame(prot, &site, value, wrapper, |w| w.content(prot, &site, value, default))
    }
}
