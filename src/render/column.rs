//! Column layout: one column per field, one row per element.
use tracing::trace;

use super::{table_attrs, Walker, NULL};
use crate::error::RenderError;
use crate::markup::Attrs;
use crate::schema::{Schema, Shape};
use crate::subprot::{Site, SubProtocol};
use crate::value::Value;

impl Walker<'_> {
    pub(crate) fn column_top(&mut self, name: &str, schema: &Schema, value: &Value) -> Result<(), RenderError> {
        match &schema.shape {
            Shape::Array(arr) => {
                let items = self.items(schema, value)?;
                self.column_table(name, &arr.item, items, true, arr.item.sub_protocol.as_deref())
            }
            // a lone record or scalar is a one-row table
            _ => {
                let prot = schema.sub_protocol.as_deref();
                self.column_table(name, schema, std::slice::from_ref(value), false, prot)
            }
        }
    }

    /// `<table><thead>…</thead><tbody>` one row per item `</tbody></table>`.
    ///
    /// Columns come from `item` alone; every row is laid out against the
    /// same schema. `prot` is the element-level sub-protocol; it is `None`
    /// when the table fills a field cell whose hooks already ran.
    pub(crate) fn column_table(
        &mut self,
        name: &str,
        item: &Schema,
        items: &[Value],
        indexed: bool,
        prot: Option<&dyn SubProtocol>,
    ) -> Result<(), RenderError> {
        trace!(depth = self.depth(), table = %item.type_name(), rows = items.len(), "column table");
        let table = self.open("table", &table_attrs(item))?;
        if self.options.header {
            self.column_header(name, item, prot)?;
        }
        let tbody = self.open("tbody", &Attrs::new())?;
        for (i, value) in items.iter().enumerate() {
            if indexed {
                self.enter(format!("[{i}]"), |w| w.column_row(name, item, value, prot))?;
            } else {
                self.column_row(name, item, value, prot)?;
            }
        }
        self.close(tbody)?;
        self.close(table)
    }

    fn column_header(&mut self, name: &str, item: &Schema, prot: Option<&dyn SubProtocol>) -> Result<(), RenderError> {
        let path = self.path_string();
        let site = Site { name, schema: item, path: &path };
        self.header(prot, &site, |w| {
            let thead = w.open("thead", &Attrs::new())?;
            let tr = w.open("tr", &Attrs::new())?;
            match &item.shape {
                Shape::Complex(ty) => {
                    for f in ty.fields() {
                        w.enter(&f.name, |w| w.column_header_cell(&f.name, &f.schema))?;
                    }
                }
                _ => {
                    let attrs = w.field_attrs(Some(name), item);
                    w.out.text_element("th", &attrs, name)?;
                }
            }
            w.close(tr)?;
            w.close(thead)
        })
    }

    fn column_header_cell(&mut self, field: &str, schema: &Schema) -> Result<(), RenderError> {
        let path = self.path_string();
        let site = Site { name: field, schema, path: &path };
        self.header(schema.sub_protocol.as_deref(), &site, |w| {
            let attrs = w.field_attrs(Some(field), schema);
            w.out.text_element("th", &attrs, field)?;
            Ok(())
        })
    }

    fn column_row(
        &mut self,
        name: &str,
        item: &Schema,
        value: &Value,
        prot: Option<&dyn SubProtocol>,
    ) -> Result<(), RenderError> {
        let path = self.path_string();
        let site = Site { name, schema: item, path: &path };
        self.row_frame(prot, &site, value, Some(("tr", Attrs::new())), |w| {
            w.content(prot, &site, value, |w| w.column_cells(name, item, value))
        })
    }

    fn column_cells(&mut self, name: &str, item: &Schema, value: &Value) -> Result<(), RenderError> {
        match &item.shape {
            Shape::Complex(ty) => {
                let record = self.record(item, value)?;
                for f in ty.fields() {
                    let field_value = record.and_then(|r| r.get(&f.name)).unwrap_or(&NULL);
                    self.enter(&f.name, |w| w.column_field_cell(&f.name, &f.schema, field_value))?;
                }
                Ok(())
            }
            _ => {
                let td = self.open("td", &self.field_attrs(Some(name), item))?;
                self.cell_content(name, item, value)?;
                self.close(td)
            }
        }
    }

    fn column_field_cell(&mut self, field: &str, schema: &Schema, value: &Value) -> Result<(), RenderError> {
        let prot = schema.sub_protocol.as_deref();
        let path = self.path_string();
        let site = Site { name: field, schema, path: &path };
        let attrs = self.field_attrs(Some(field), schema);
        self.row_frame(prot, &site, value, Some(("td", attrs)), |w| {
            w.content(prot, &site, value, |w| w.cell_content(field, schema, value))
        })
    }
}
