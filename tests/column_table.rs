use std::sync::Arc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use schema_tables::{ComplexType, Field, HtmlTable, Layout, RenderError, RenderOptions, Schema, Uri, Value};

fn cm() -> Arc<ComplexType> {
    ComplexType::new("CM", vec![
        Field::new("i", Schema::integer()),
        Field::new("s", Schema::string()),
    ])
    .unwrap()
}

fn ccm(c: Schema) -> Arc<ComplexType> {
    ComplexType::new("CCM", vec![
        Field::new("c", c),
        Field::new("i", Schema::integer()),
        Field::new("s", Schema::string()),
    ])
    .unwrap()
}

fn ccm_value() -> Value {
    Value::record([
        ("c", Value::record([("i", Value::Integer(123)), ("s", Value::text("abc"))])),
        ("i", Value::Integer(456)),
        ("s", Value::text("def")),
    ])
}

fn names_only() -> RenderOptions {
    RenderOptions::default().without_field_type_name_attr()
}

fn bare() -> RenderOptions {
    RenderOptions::default().without_field_name_attr().without_field_type_name_attr()
}

fn strip_attrs(html: &str) -> String {
    let mut out = String::new();
    let (mut in_tag, mut skipping) = (false, false);
    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                out.push(c);
            }
            '>' => {
                in_tag = false;
                skipping = false;
                out.push(c);
            }
            ' ' if in_tag => skipping = true,
            _ if skipping => {}
            _ => out.push(c),
        }
    }
    out
}

#[test]
fn string_array() {
    let schema = Schema::array(Schema::string());
    let value = Value::Array(vec!["1".into(), "2".into()]);
    let html = HtmlTable::column(bare()).render_to_string(&schema, &value, "some_callResponse").unwrap();
    assert_eq!(
        html,
        "<table class=\"string\">\
           <thead><tr><th>some_callResponse</th></tr></thead>\
           <tbody><tr><td>1</td></tr><tr><td>2</td></tr></tbody>\
         </table>"
    );
}

#[test]
fn complex_array_nests_sub_tables() {
    let schema = Schema::array(Schema::complex(ccm(Schema::complex(cm()))));
    let value = Value::Array(vec![ccm_value(), ccm_value()]);
    let html = HtmlTable::column(names_only()).render_to_string(&schema, &value, "some_callResponse").unwrap();

    let row = "<tr>\
        <td class=\"c\"><table class=\"CM\">\
          <thead><tr><th class=\"i\">i</th><th class=\"s\">s</th></tr></thead>\
          <tbody><tr><td class=\"i\">123</td><td class=\"s\">abc</td></tr></tbody>\
        </table></td>\
        <td class=\"i\">456</td>\
        <td class=\"s\">def</td>\
      </tr>";
    let expected = format!(
        "<table class=\"CCM\">\
           <thead><tr><th class=\"c\">c</th><th class=\"i\">i</th><th class=\"s\">s</th></tr></thead>\
           <tbody>{row}{row}</tbody>\
         </table>"
    );
    assert_eq!(html, expected);
}

#[test]
fn name_and_type_share_the_class_attribute() {
    let schema = Schema::array(Schema::complex(cm()));
    let value = Value::Array(vec![Value::record([("i", Value::Integer(1)), ("s", Value::text("a"))])]);
    let html = HtmlTable::column(RenderOptions::default()).render_to_string(&schema, &value, "r").unwrap();
    assert_eq!(
        html,
        "<table class=\"CM\">\
           <thead><tr><th class=\"i integer\">i</th><th class=\"s string\">s</th></tr></thead>\
           <tbody><tr><td class=\"i integer\">1</td><td class=\"s string\">a</td></tr></tbody>\
         </table>"
    );
}

#[test]
fn distinct_attribute_names() {
    let options = RenderOptions {
        field_name_attr: Some("data-field".into()),
        field_type_name_attr: Some("data-type".into()),
        header: false,
    };
    let schema = Schema::array(Schema::complex(cm()));
    let value = Value::Array(vec![Value::record([("i", Value::Integer(1))])]);
    let html = HtmlTable::column(options).render_to_string(&schema, &value, "r").unwrap();
    assert_eq!(
        html,
        "<table class=\"CM\"><tbody><tr>\
           <td data-field=\"i\" data-type=\"integer\">1</td>\
           <td data-field=\"s\" data-type=\"string\"></td>\
         </tr></tbody></table>"
    );
}

#[test]
fn disabling_attributes_keeps_structure() {
    let schema = Schema::array(Schema::complex(ccm(Schema::complex(cm()))));
    let value = Value::Array(vec![ccm_value(), ccm_value(), ccm_value()]);
    let with = HtmlTable::column(RenderOptions::default()).render_to_string(&schema, &value, "r").unwrap();
    let without = HtmlTable::column(bare()).render_to_string(&schema, &value, "r").unwrap();
    assert!(with.contains("class=\"c CM\""));
    assert!(!without.contains("class=\"c"));
    assert_eq!(strip_attrs(&with), strip_attrs(&without));
}

#[test]
fn any_uri_renders_anchor() {
    let c = ComplexType::new("C", vec![Field::new("c", Schema::any_uri())]).unwrap();
    let schema = Schema::array(Schema::complex(c));
    let link = "http://arskom.com.tr/";

    let plain = Value::Array(vec![Value::record([("c", Value::Uri(Uri::new(link)))])]);
    let html = HtmlTable::column(names_only()).render_to_string(&schema, &plain, "r").unwrap();
    assert!(html.contains(r#"<td class="c"><a href="http://arskom.com.tr/">http://arskom.com.tr/</a></td>"#), "{html}");

    let text = Value::Array(vec![Value::record([("c", Value::text(link))])]);
    let html = HtmlTable::column(names_only()).render_to_string(&schema, &text, "r").unwrap();
    assert!(html.contains(r#"<td class="c"><a href="http://arskom.com.tr/">http://arskom.com.tr/</a></td>"#), "{html}");

    let titled = Value::Array(vec![Value::record([("c", Value::Uri(Uri::with_text(link, "Arskom")))])]);
    let html = HtmlTable::column(names_only()).render_to_string(&schema, &titled, "r").unwrap();
    assert!(html.contains(r#"<td class="c"><a href="http://arskom.com.tr/">Arskom</a></td>"#), "{html}");
}

#[test]
fn header_flag_drops_thead() {
    let schema = Schema::array(Schema::string());
    let value = Value::Array(vec!["x".into()]);
    let html = HtmlTable::column(bare().without_header()).render_to_string(&schema, &value, "r").unwrap();
    assert_eq!(html, "<table class=\"string\"><tbody><tr><td>x</td></tr></tbody></table>");
}

#[test]
fn lone_record_is_one_row() {
    let schema = Schema::complex(cm());
    let value = Value::record([("s", Value::text("a")), ("i", Value::Integer(1))]);
    let html = HtmlTable::column(names_only()).render_to_string(&schema, &value, "r").unwrap();
    assert_eq!(
        html,
        "<table class=\"CM\">\
           <thead><tr><th class=\"i\">i</th><th class=\"s\">s</th></tr></thead>\
           <tbody><tr><td class=\"i\">1</td><td class=\"s\">a</td></tr></tbody>\
         </table>"
    );
}

#[test]
fn null_cells_are_empty() {
    let schema = Schema::array(Schema::complex(ccm(Schema::complex(cm()))));
    let value = Value::Array(vec![Value::record([("i", Value::Integer(1)), ("c", Value::Null)])]);
    let html = HtmlTable::column(names_only().without_header()).render_to_string(&schema, &value, "r").unwrap();
    assert_eq!(
        html,
        "<table class=\"CCM\"><tbody><tr>\
           <td class=\"c\"></td><td class=\"i\">1</td><td class=\"s\"></td>\
         </tr></tbody></table>"
    );
}

#[test]
fn field_layout_override_switches_to_rows() {
    let schema = Schema::array(Schema::complex(ccm(Schema::complex(cm()).with_layout(Layout::Row))));
    let value = Value::Array(vec![ccm_value()]);
    let html = HtmlTable::column(names_only()).render_to_string(&schema, &value, "r").unwrap();
    assert!(html.starts_with(
        "<table class=\"CCM\">\
           <thead><tr><th class=\"c\">c</th><th class=\"i\">i</th><th class=\"s\">s</th></tr></thead>\
           <tbody><tr><td class=\"c\">\
           <table class=\"CM\"><tbody>\
             <tr><th class=\"i\">i</th><td class=\"i\">123</td></tr>"
    ), "{html}");
}

#[test]
fn nested_scalar_array_field() {
    let tagged = ComplexType::new("Tagged", vec![Field::new("tags", Schema::array(Schema::string()))]).unwrap();
    let schema = Schema::complex(tagged);
    let value = Value::record([("tags", Value::Array(vec!["a".into(), "b".into()]))]);
    let html = HtmlTable::column(names_only().without_header()).render_to_string(&schema, &value, "r").unwrap();
    assert_eq!(
        html,
        "<table class=\"Tagged\"><tbody><tr><td class=\"tags\">\
           <table class=\"string\"><tbody>\
             <tr><td class=\"tags\">a</td></tr><tr><td class=\"tags\">b</td></tr>\
           </tbody></table>\
         </td></tr></tbody></table>"
    );
}

#[test]
fn inherited_fields_lead() {
    let b = ComplexType::derive("B", cm(), vec![
        Field::new("x", Schema::boolean()),
        Field::new("i", Schema::float()),
    ])
    .unwrap();
    let schema = Schema::array(Schema::complex(b));
    let value = Value::Array(vec![Value::record([
        ("x", Value::Bool(true)),
        ("i", Value::float(1.5)),
        ("s", Value::text("q")),
    ])]);
    let html = HtmlTable::column(RenderOptions::default()).render_to_string(&schema, &value, "r").unwrap();
    assert_eq!(
        html,
        "<table class=\"B\">\
           <thead><tr><th class=\"i float\">i</th><th class=\"s string\">s</th><th class=\"x boolean\">x</th></tr></thead>\
           <tbody><tr><td class=\"i float\">1.5</td><td class=\"s string\">q</td><td class=\"x boolean\">true</td></tr></tbody>\
         </table>"
    );
}

#[test]
fn scalar_where_array_expected() {
    let schema = Schema::array(Schema::complex(cm()));
    let err = HtmlTable::column(bare()).render_to_string(&schema, &Value::text("x"), "resp").unwrap_err();
    match err {
        RenderError::SchemaMismatch { path, found, .. } => {
            assert_eq!(path, "resp");
            assert_eq!(found, "text");
        }
        other => panic!("unexpected: {other}"),
    }
}

#[test]
fn mismatch_deep_in_a_row_reports_path() {
    let schema = Schema::array(Schema::complex(ccm(Schema::complex(cm()))));
    let bad = Value::record([("c", Value::record([("i", Value::text("nope"))]))]);
    let value = Value::Array(vec![ccm_value(), bad]);
    let err = HtmlTable::column(bare()).render_to_string(&schema, &value, "resp").unwrap_err();
    match err {
        RenderError::SchemaMismatch { path, expected, found } => {
            assert_eq!(path, "resp[1].c.i");
            assert_eq!(expected, "integer");
            assert_eq!(found, "text");
        }
        other => panic!("unexpected: {other}"),
    }
}

proptest! {
    #[test]
    fn scalar_array_has_one_column_and_n_rows(items in prop::collection::vec("[a-z0-9]{0,6}", 0..20)) {
        let schema = Schema::array(Schema::string());
        let value = Value::Array(items.iter().map(|s| Value::text(s.as_str())).collect());
        let html = HtmlTable::column(bare()).render_to_string(&schema, &value, "resp").unwrap();

        prop_assert_eq!(html.matches("<th>").count(), 1);
        prop_assert_eq!(html.matches("<td>").count(), items.len());
        let rows: String = items.iter().map(|s| format!("<tr><td>{s}</td></tr>")).collect();
        let expected = format!(
            "<table class=\"string\"><thead><tr><th>resp</th></tr></thead><tbody>{rows}</tbody></table>"
        );
        prop_assert_eq!(html, expected);
    }
}
